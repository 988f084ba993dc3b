//! Human-readable description of the scoring model

use crate::ranking::composite::ComponentWeights;
use crate::scoring::tiers::PositionTier;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Placement tier as shown in the legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierLegend {
    pub tier: PositionTier,
    pub threshold: Option<u32>,
    pub multiplier: f64,
}

/// Category weight as shown in the legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLegend {
    pub category: Category,
    pub code: String,
    pub weight: f64,
}

/// The complete scoring model: tiers, category weights and component weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringLegend {
    pub position_tiers: Vec<TierLegend>,
    /// Ordered by descending weight
    pub category_weights: Vec<CategoryLegend>,
    pub component_weights: ComponentWeights,
}

impl ScoringLegend {
    /// Legend of the scoring model in use
    pub fn current() -> Self {
        let position_tiers = PositionTier::ALL
            .into_iter()
            .map(|tier| TierLegend {
                tier,
                threshold: tier.threshold(),
                multiplier: tier.multiplier(),
            })
            .collect();

        let mut category_weights: Vec<CategoryLegend> = Category::ALL
            .into_iter()
            .map(|category| CategoryLegend {
                category,
                code: category.code().to_string(),
                weight: category.weight(),
            })
            .collect();
        category_weights.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        Self {
            position_tiers,
            category_weights,
            component_weights: ComponentWeights::default(),
        }
    }

    /// Render the legend as plain text
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "POSITION TIERS:");
        for tier in &self.position_tiers {
            match tier.threshold {
                Some(limit) => {
                    let _ = writeln!(
                        out,
                        "{}: positions 1-{} get {}x multiplier",
                        tier.tier, limit, tier.multiplier
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{}: lower or missing placement gets {}x multiplier",
                        tier.tier, tier.multiplier
                    );
                }
            }
        }

        let _ = writeln!(out, "\nCATEGORY WEIGHTS:");
        for entry in &self.category_weights {
            let _ = writeln!(
                out,
                "{} ({}): {:.1}%",
                entry.category,
                entry.code,
                entry.weight * 100.0
            );
        }

        let weights = &self.component_weights;
        let _ = writeln!(out, "\nCOMPOSITE WEIGHTS:");
        let _ = writeln!(out, "Participation: {:.1}%", weights.participation * 100.0);
        let _ = writeln!(out, "Community: {:.1}%", weights.community * 100.0);
        let _ = writeln!(out, "Performance: {:.1}%", weights.performance * 100.0);

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_orders_categories_by_weight() {
        let legend = ScoringLegend::current();
        let order: Vec<Category> = legend.category_weights.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Fun,
                Category::Overall,
                Category::Mood,
                Category::Graphics,
                Category::Innovation,
                Category::Audio,
                Category::Theme,
                Category::Humor,
            ]
        );
        assert_eq!(legend.position_tiers.len(), 5);
    }

    #[test]
    fn test_render_text() {
        let text = ScoringLegend::current().render_text();
        assert!(text.starts_with("POSITION TIERS:"));
        assert!(text.contains("Top 15: positions 1-15 get 12x multiplier"));
        assert!(text.contains("Others: lower or missing placement gets 0.7x multiplier"));
        assert!(text.contains("Fun (grade-02): 35.0%"));
        assert!(text.contains("Performance: 80.0%"));
    }
}
