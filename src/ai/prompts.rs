//! Prompt templates sent to the text-generation backends.

/// Prompt asking for a fresh commercial description of a product.
pub fn product_description(
    name: &str,
    category: &str,
    brand: &str,
    basic_info: Option<&str>,
) -> String {
    let additional_info = basic_info
        .map(str::trim)
        .filter(|info| !info.is_empty())
        .map(|info| format!("- Additional information: {info}\n"))
        .unwrap_or_default();

    format!(
        "Write an engaging and detailed description for an e-commerce product.

Product information:
- Name: {name}
- Category: {category}
- Brand: {brand}
{additional_info}
Instructions:
1. Write an appealing commercial description (2-3 paragraphs)
2. Highlight the main features and benefits
3. Use a professional but approachable tone
4. Include possible uses or applications
5. Do NOT mention prices or availability

Description:"
    )
}

/// Prompt asking for a numbered list of product ideas for a category.
pub fn product_suggestions(category: &str, count: i32) -> String {
    format!(
        "Generate a list of {count} popular products for the category: {category}

For each product include:
- Product name
- Suggested brand (may be fictional but realistic)
- Short description (1 line)

Format:
1. [Name] - [Brand] - [Short description]
2. [Name] - [Brand] - [Short description]
...

Product list:"
    )
}

/// Prompt asking to polish an existing description.
pub fn improve_description(current_description: &str) -> String {
    format!(
        "Improve the following product description to make it more appealing and complete:

Current description:
{current_description}

Improvement instructions:
1. Keep the existing information
2. Make it more persuasive and commercial
3. Add relevant details where appropriate
4. Improve its structure and flow
5. Make sure it sounds professional

Improved description:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_prompt_includes_product_fields() {
        let prompt = product_description("iPhone 15 Pro", "Smartphones", "Apple", None);

        assert!(prompt.contains("- Name: iPhone 15 Pro"));
        assert!(prompt.contains("- Category: Smartphones"));
        assert!(prompt.contains("- Brand: Apple"));
        assert!(!prompt.contains("Additional information"));
        assert!(prompt.ends_with("Description:"));
    }

    #[test]
    fn description_prompt_includes_basic_info_when_present() {
        let prompt = product_description(
            "iPhone 15 Pro",
            "Smartphones",
            "Apple",
            Some(" Latest iPhone with A17 Pro chip "),
        );

        assert!(prompt.contains("- Additional information: Latest iPhone with A17 Pro chip\n"));
    }

    #[test]
    fn blank_basic_info_is_ignored() {
        let prompt = product_description("Widget", "Tools", "Acme", Some("   "));

        assert!(!prompt.contains("Additional information"));
    }

    #[test]
    fn suggestions_prompt_includes_count_and_category() {
        let prompt = product_suggestions("Laptops", 3);

        assert!(
            prompt.starts_with("Generate a list of 3 popular products for the category: Laptops")
        );
    }

    #[test]
    fn improve_prompt_embeds_current_description() {
        let prompt = improve_description("A nice phone.");

        assert!(prompt.contains("Current description:\nA nice phone.\n"));
    }
}
