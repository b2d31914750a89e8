// src/core/cost.rs — USD cost from reported token usage

use crate::provider::TokenUsage;

/// Calculate cost in USD for a given model and token usage.
pub fn calculate_cost(model: &str, usage: &TokenUsage) -> f64 {
    let (input_price, output_price) = model_pricing(model);
    let input_cost = (usage.input_tokens as f64 / 1_000_000.0) * input_price;
    let output_cost = (usage.output_tokens as f64 / 1_000_000.0) * output_price;
    input_cost + output_cost
}

/// Returns (input_price_per_mtok, output_price_per_mtok).
pub fn model_pricing(model: &str) -> (f64, f64) {
    match model {
        m if m.contains("claude-opus") => (15.0, 75.0),
        m if m.contains("claude-sonnet") => (3.0, 15.0),
        m if m.contains("claude-haiku") || m.contains("haiku") => (0.25, 1.25),

        // Unknown models: assume the most expensive tier so the cost budget
        // errs toward stopping early rather than overspending.
        _ => (15.0, 75.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(input: u32, output: u32) -> TokenUsage {
        TokenUsage {
            input_tokens: input,
            output_tokens: output,
        }
    }

    #[test]
    fn test_pricing_tiers() {
        assert_eq!(model_pricing("claude-opus-4-5"), (15.0, 75.0));
        assert_eq!(model_pricing("claude-sonnet-4-5"), (3.0, 15.0));
        assert_eq!(model_pricing("claude-haiku-3-5"), (0.25, 1.25));
    }

    #[test]
    fn test_pricing_unknown_defaults_expensive() {
        assert_eq!(model_pricing("some-unknown-model"), (15.0, 75.0));
    }

    #[test]
    fn test_calculate_cost_basic() {
        let cost = calculate_cost("claude-sonnet-4-5", &usage(1_000_000, 500_000));
        // 1M input × $3/Mtok + 500K output × $15/Mtok = $3 + $7.50
        assert!((cost - 10.50).abs() < 0.001);
    }

    #[test]
    fn test_calculate_cost_zero_usage() {
        assert_eq!(calculate_cost("claude-opus-4-5", &usage(0, 0)), 0.0);
    }

    #[test]
    fn test_calculate_cost_typical_attempt() {
        // A realistic generate call: ~3K in, ~2K out on sonnet
        let cost = calculate_cost("claude-sonnet-4-5", &usage(3_000, 2_000));
        assert!(cost > 0.0);
        assert!(cost < 0.05);
    }
}
