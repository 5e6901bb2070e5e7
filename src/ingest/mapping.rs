use std::collections::BTreeMap;

/// Relabels provider categories into budget categories during ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMapping {
    rules: BTreeMap<String, String>,
}

impl CategoryMapping {
    pub fn new(rules: BTreeMap<String, String>) -> Self {
        Self { rules }
    }

    /// Household budget grouping for common Tinkoff/Sberbank categories.
    pub fn budget_defaults() -> Self {
        let pairs = [
            ("Супермаркеты", "Продукты"),
            ("Фастфуд", "Продукты"),
            ("Рестораны", "Продукты"),
            ("Такси", "Проезд"),
            ("Каршеринг", "Проезд"),
            ("Местный транспорт", "Проезд"),
            ("Аренда авто", "Проезд"),
            ("Топливо", "Проезд"),
            ("Автоуслуги", "Проезд"),
            ("Бонусы", "Кэш"),
            ("Услуги банка", "Кэш"),
            ("Связь", "Телефон/Интернет"),
            ("Животные", "Гайка"),
            ("Кредиты", "Кредит"),
        ];
        Self::new(
            pairs
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        )
    }

    pub fn rules(&self) -> &BTreeMap<String, String> {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns the bucket label and, when it differs, the source label.
    pub fn apply(&self, source: String) -> (String, Option<String>) {
        match self.rules.get(&source) {
            Some(target) if *target != source => (target.clone(), Some(source)),
            _ => (source, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_labels_keep_their_origin() {
        let mapping = CategoryMapping::budget_defaults();
        let (label, original) = mapping.apply("Такси".to_string());
        assert_eq!(label, "Проезд");
        assert_eq!(original.as_deref(), Some("Такси"));

        let (label, original) = mapping.apply("Одежда и обувь".to_string());
        assert_eq!(label, "Одежда и обувь");
        assert!(original.is_none());
    }
}
