//! Wire payloads for the gateway's send operations.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Label on the button that expands a list menu.
pub const LIST_BUTTON_TEXT: &str = "Выбрать";

/// One titled group of rows in a list menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSection {
    #[serde(default)]
    pub title: Option<String>,
    pub items: Vec<String>,
}

impl MenuSection {
    pub fn new(title: impl Into<String>, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            title: Some(title.into()),
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn text_payload(chat_id: &str, text: &str) -> Value {
    json!({ "chatId": chat_id, "message": text })
}

pub fn buttons_payload(chat_id: &str, text: &str, options: &[&str]) -> Value {
    let buttons: Vec<Value> = options
        .iter()
        .enumerate()
        .map(|(index, label)| {
            json!({
                "buttonId": format!("btn_{}", index + 1),
                "buttonText": { "displayText": label },
                "type": 1,
            })
        })
        .collect();
    json!({
        "chatId": chat_id,
        "message": text,
        "footer": "",
        "buttons": buttons,
    })
}

pub fn list_payload(
    chat_id: &str,
    title: &str,
    description: &str,
    sections: &[MenuSection],
) -> Value {
    let sections: Vec<Value> = sections
        .iter()
        .enumerate()
        .map(|(section_index, section)| {
            let rows: Vec<Value> = section
                .items
                .iter()
                .enumerate()
                .map(|(item_index, item)| {
                    json!({
                        "title": item,
                        "description": "",
                        "rowId": format!("option_{section_index}_{item_index}"),
                    })
                })
                .collect();
            let title = section
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("Раздел {}", section_index + 1));
            json!({ "title": title, "rows": rows })
        })
        .collect();
    json!({
        "chatId": chat_id,
        "message": {
            "text": title,
            "title": title,
            "description": description,
            "buttonText": LIST_BUTTON_TEXT,
            "sections": sections,
        }
    })
}

/// `1. first\n2. second...`
pub fn numbered_options(options: &[&str]) -> String {
    options
        .iter()
        .enumerate()
        .map(|(index, label)| format!("{}. {label}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain-text rendition of a button menu.
pub fn numbered_menu(text: &str, options: &[&str]) -> String {
    format!("{text}\n\n{}", numbered_options(options))
}

/// Plain-text rendition of a list menu: title, optional description, then
/// every row of every section numbered in order.
pub fn numbered_list(title: &str, description: &str, sections: &[MenuSection]) -> String {
    let items: Vec<&str> = sections
        .iter()
        .flat_map(|section| section.items.iter().map(String::as_str))
        .collect();
    let header = if description.trim().is_empty() {
        title.to_string()
    } else {
        format!("{title}\n{description}")
    };
    numbered_menu(&header, &items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_get_one_based_ids() {
        let payload = buttons_payload("1@c.us", "pick", &["a", "b"]);
        assert_eq!(payload["chatId"], "1@c.us");
        assert_eq!(payload["footer"], "");
        assert_eq!(payload["buttons"][0]["buttonId"], "btn_1");
        assert_eq!(payload["buttons"][1]["buttonId"], "btn_2");
        assert_eq!(payload["buttons"][1]["buttonText"]["displayText"], "b");
        assert_eq!(payload["buttons"][1]["type"], 1);
    }

    #[test]
    fn list_rows_carry_section_and_item_index() {
        let sections = vec![
            MenuSection::new("Дома", ["Комфорт", "Эконом"]),
            MenuSection {
                title: None,
                items: vec!["Баня".into()],
            },
        ];
        let payload = list_payload("1@c.us", "Меню", "выберите", &sections);
        let message = &payload["message"];
        assert_eq!(message["buttonText"], LIST_BUTTON_TEXT);
        assert_eq!(message["sections"][0]["rows"][1]["rowId"], "option_0_1");
        assert_eq!(message["sections"][0]["rows"][1]["title"], "Эконом");
        assert_eq!(message["sections"][1]["title"], "Раздел 2");
        assert_eq!(message["sections"][1]["rows"][0]["rowId"], "option_1_0");
    }

    #[test]
    fn numbered_menu_lists_options_after_blank_line() {
        assert_eq!(
            numbered_menu("Выберите:", &["Номера", "Контакты"]),
            "Выберите:\n\n1. Номера\n2. Контакты"
        );
    }

    #[test]
    fn numbered_list_flattens_sections() {
        let sections = [
            MenuSection::new("Дома", ["Комфорт", "Эконом"]),
            MenuSection::new("Бани", ["Русская"]),
        ];
        assert_eq!(
            numbered_list("Размещение", "Выберите дом", &sections),
            "Размещение\nВыберите дом\n\n1. Комфорт\n2. Эконом\n3. Русская"
        );
        assert_eq!(
            numbered_list("Размещение", " ", &sections[1..]),
            "Размещение\n\n1. Русская"
        );
    }
}
