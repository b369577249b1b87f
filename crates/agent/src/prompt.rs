//! Prompt assembly for the inventory assistant.
//!
//! One prompt per turn: retrieved schema context, the action contract the
//! interpreter understands, few-shot examples, and the user's query. The
//! format lines here and the interpreter's layers are two halves of the
//! same contract — change one, change both.

/// Build the full prompt for one turn.
pub fn build_prompt(context: &str, query: &str) -> String {
    let context = if context.is_empty() {
        "(no schema context retrieved)"
    } else {
        context
    };

    format!(
        "\
You are a helpful assistant for managing an inventory database.

Database Schema:
{context}

Available Actions:
- add_item: Add a new item. Parameters: name (string), description (string, optional), quantity (integer, default 0), category (string, optional)
- list_items: List items. Parameters: category (string, optional) - use {{}} for all items
- update_quantity: Update quantity of an item. Parameters: item_id (integer), new_quantity (integer)

IMPORTANT: You MUST respond with EXACTLY one of these formats:
For actions: ACTION: <action_name> <json_parameters>
For questions: ANSWER: <your_answer>

User Query: {query}

Examples:
- \"Add a laptop\" -> ACTION: add_item {{\"name\": \"laptop\", \"quantity\": 1}}
- \"List all items\" -> ACTION: list_items {{}}
- \"Update item 1 to 5\" -> ACTION: update_quantity {{\"item_id\": 1, \"new_quantity\": 5}}
- \"How many items are there?\" -> ANSWER: There are X items in the database.

Respond with ACTION or ANSWER format only. For list_items, always include parameters even if empty.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_context_and_query() {
        let prompt = build_prompt("Table: items", "add a laptop");
        assert!(prompt.contains("Table: items"));
        assert!(prompt.contains("User Query: add a laptop"));
    }

    #[test]
    fn prompt_lists_all_actions() {
        let prompt = build_prompt("", "anything");
        for action in crate::interpreter::ACTION_NAMES {
            assert!(prompt.contains(action), "prompt must describe {action}");
        }
    }

    #[test]
    fn empty_context_gets_a_placeholder() {
        let prompt = build_prompt("", "q");
        assert!(prompt.contains("(no schema context retrieved)"));
    }
}
