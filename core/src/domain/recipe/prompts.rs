//! Instructions sent with each generation call.
//!
//! Detection and parsing answers are read through `extract_fenced_json`, so the
//! instructions ask for bare JSON but the code tolerates fenced output.

pub const MAX_DETECTED_ITEMS: usize = 100;

pub const DETECTION_SYSTEM_INSTRUCTION: &str = "Return a JSON array with labels. Never return masks or code fencing. \
Limit to 100 objects. If an object is present multiple times, ignore them. \
Look for unique items in the space.";

pub const DETECTION_PROMPT: &str = "Detect food items in a fridge or kitchen environment (with \"label\" as specific item name). \
Do not repeat the same item. Look all over the image. \
Name them in a way that is generally written in recipes.";

pub const SEARCH_SYSTEM_INSTRUCTION: &str =
    "You are a helpful culinary assistant that finds recipes based on available ingredients.";

pub const PARSE_SYSTEM_INSTRUCTION: &str = r#"You convert recipe text into JSON. Answer with a single ```json fenced block and nothing else.
The block holds an array of recipes. Each recipe has exactly these fields:
- "type": one of "breakfast", "lunch", "dinner"
- "title": the recipe name
- "totalTime": total preparation and cooking time, e.g. "35 minutes"
- "steps": an array of objects with
  - "description": what to do in this step
  - "timeToComplete": how long the step takes, e.g. "5 minutes"
  - "ingredients": array of ingredient names used in the step
If the text contains no recipe, answer with an empty array."#;

pub fn build_search_prompt(ingredients: &[String]) -> String {
    format!(
        r#"I have the following ingredients in my fridge/kitchen: {}.

Search the web and find me a suitable recipe that uses most of these ingredients.
Format your response as follows:

1. Recipe name (with a link to the source)
2. Ingredients I already have from my list
3. Additional ingredients I'll need to buy
4. Brief cooking instructions
5. Estimated cooking time
6. Number of servings

Do not make up a recipe - only use recipes you can find from real websites.
Prefer recipes that use as many of my ingredients as possible."#,
        ingredients.join(", ")
    )
}

pub fn build_parse_prompt(raw_recipe: &str) -> String {
    format!("Convert this recipe text:\n\n{}", raw_recipe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_prompt_lists_every_ingredient() {
        let prompt = build_search_prompt(&["Egg".to_string(), "Milk".to_string()]);
        assert!(prompt.starts_with("I have the following ingredients in my fridge/kitchen: Egg, Milk."));
    }

    #[test]
    fn parse_prompt_embeds_raw_text() {
        assert!(build_parse_prompt("# Pancakes").ends_with("# Pancakes"));
    }
}
