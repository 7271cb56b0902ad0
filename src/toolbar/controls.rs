//! 分面控件投影：渲染方据此绘制筛选下拉，访问门关闭时全部禁用

use serde::Serialize;

use crate::core::ToolbarContext;
use crate::facets::Facet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetControl {
    pub facet: Facet,
    pub label: String,
    pub placeholder: String,
    pub is_disabled: bool,
}

impl FacetControl {
    fn new(facet: Facet, is_disabled: bool) -> Self {
        let label = facet.label().to_string();
        Self {
            facet,
            placeholder: format!("Filter by {}", label.to_lowercase()),
            label,
            is_disabled,
        }
    }
}

/// 外部直接提供行数据时不展示内置控件；标签控件还需 show_tags
pub fn controls(ctx: &ToolbarContext) -> Vec<FacetControl> {
    if ctx.has_items {
        return Vec::new();
    }
    let enabled = ctx.enabled();
    Facet::ALL
        .into_iter()
        .filter(|facet| enabled.is_enabled(*facet))
        .filter(|facet| *facet != Facet::Tags || ctx.show_tags)
        .map(|facet| FacetControl::new(facet, !ctx.has_access))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_follow_gates() {
        let mut ctx = ToolbarContext::default();
        let facets: Vec<_> = controls(&ctx).iter().map(|c| c.facet).collect();
        assert_eq!(facets, vec![Facet::Text, Facet::Staleness, Facet::RegisteredWith]);

        ctx.show_tags = true;
        ctx.has_access = false;
        let all = controls(&ctx);
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|c| c.is_disabled));
        assert_eq!(all[0].placeholder, "Filter by name");

        ctx.has_items = true;
        assert!(controls(&ctx).is_empty());
    }
}
