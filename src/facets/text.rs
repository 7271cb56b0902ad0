//! 文本分面：按显示名模糊匹配

use super::{Chip, ChipDescriptor, ChipKind, Facet, FacetStore};

/// 保存用户输入原文；chip 与下发的筛选值使用去除首尾空白后的文本
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFacet {
    value: String,
}

impl TextFacet {
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

impl FacetStore for TextFacet {
    type Value = String;

    const FACET: Facet = Facet::Text;

    fn read(&self) -> &String {
        &self.value
    }

    fn write(&mut self, value: String) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    fn chip(&self) -> Vec<ChipDescriptor> {
        let text = self.trimmed();
        if text.is_empty() {
            return Vec::new();
        }
        vec![ChipDescriptor {
            kind: ChipKind::Text,
            category: "Display name".to_string(),
            key: None,
            chips: vec![Chip::new(text, text)],
        }]
    }

    /// 只有空白也算恒等值
    fn is_identity(&self) -> bool {
        self.trimmed().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chip_is_trimmed() {
        let mut facet = TextFacet::default();
        assert!(facet.write("  prod ".into()));
        let chips = facet.chip();
        assert_eq!(chips.len(), 1);
        assert_eq!(chips[0].chips[0].name, "prod");
        // 原文保留，便于输入框回显
        assert_eq!(facet.read(), "  prod ");
    }

    #[test]
    fn test_whitespace_only_has_no_chip() {
        let mut facet = TextFacet::default();
        facet.write("   ".into());
        assert!(facet.chip().is_empty());
        assert!(facet.is_identity());
        assert_eq!(facet.read(), "   ");
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let mut facet = TextFacet::default();
        assert!(facet.write("a".into()));
        assert!(!facet.write("a".into()));
    }
}
