//! Exact-match routing from inbound text to a reply action.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::catalog::{NO_TRANSFER, Topic};
use crate::menu::MAIN_MENU;

/// What to do with a recognized command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Send one catalog entry.
    SendCatalog(Topic),
    /// Re-send the welcome text with the main menu.
    ReshowMenu,
    /// Acknowledge a request for a human. Nothing is routed anywhere.
    SendOperatorAck,
    /// Send a fixed one-off line.
    Reply(&'static str),
}

const MENU_ALIASES: &[&str] = &["меню", "старт", "start", "/start"];
const OPERATOR_ALIASES: &[&str] = &["оператор", "человек", "поддержка"];

const TOPIC_ALIASES: &[(&str, Topic)] = &[
    ("информация", Topic::Rules),
    ("важная информация", Topic::Rules),
    ("номера", Topic::Rooms),
    ("номерной фонд", Topic::Rooms),
    ("комнаты", Topic::Rooms),
    ("развлечения", Topic::Activities),
    ("что делать", Topic::Activities),
    ("территория", Topic::Grounds),
    ("на территории", Topic::Grounds),
    ("услуги", Topic::Grounds),
    ("контакты", Topic::Contacts),
    ("телефон", Topic::Contacts),
    ("добраться", Topic::Directions),
    ("как добраться", Topic::Directions),
    ("дорога", Topic::Directions),
    ("помощь", Topic::Help),
    ("help", Topic::Help),
    ("команды", Topic::Help),
    ("бронирование", Topic::Booking),
    ("забронировать", Topic::Booking),
    ("заказать", Topic::Booking),
];

static TABLE: Lazy<HashMap<String, Action>> = Lazy::new(build_table);

fn build_table() -> HashMap<String, Action> {
    let mut table = HashMap::new();
    for (index, item) in MAIN_MENU.iter().enumerate() {
        table.insert((index + 1).to_string(), Action::SendCatalog(item.topic));
        table.insert(normalize(item.label), Action::SendCatalog(item.topic));
    }
    for alias in MENU_ALIASES {
        table.insert((*alias).to_string(), Action::ReshowMenu);
    }
    for alias in OPERATOR_ALIASES {
        table.insert((*alias).to_string(), Action::SendOperatorAck);
    }
    for (alias, topic) in TOPIC_ALIASES {
        table.insert((*alias).to_string(), Action::SendCatalog(*topic));
    }
    table.insert("трансфер".to_string(), Action::Reply(NO_TRANSFER));
    table
}

/// Lower-cases and trims surrounding whitespace.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Looks up `text` after normalization. Unrecognized input maps to the
/// `Unknown` catalog entry, so every message gets some reply.
pub fn resolve(text: &str) -> Action {
    TABLE
        .get(&normalize(text))
        .copied()
        .unwrap_or(Action::SendCatalog(Topic::Unknown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_ignores_case_and_surrounding_space() {
        assert_eq!(resolve("меню"), Action::ReshowMenu);
        assert_eq!(resolve("МЕНЮ"), Action::ReshowMenu);
        assert_eq!(resolve(" меню "), Action::ReshowMenu);
        assert_eq!(resolve("\tStart\n"), Action::ReshowMenu);
    }

    #[test]
    fn digits_follow_menu_order() {
        for (index, item) in MAIN_MENU.iter().enumerate() {
            let digit = (index + 1).to_string();
            assert_eq!(resolve(&digit), Action::SendCatalog(item.topic));
            assert_eq!(resolve(item.label), resolve(&digit));
        }
        assert_eq!(resolve("0"), Action::SendCatalog(Topic::Unknown));
        assert_eq!(resolve("7"), Action::SendCatalog(Topic::Unknown));
        assert_eq!(resolve("+1"), Action::SendCatalog(Topic::Unknown));
    }

    #[test]
    fn no_prefix_or_fuzzy_matching() {
        assert_eq!(resolve("меню пожалуйста"), Action::SendCatalog(Topic::Unknown));
        assert_eq!(resolve("мен"), Action::SendCatalog(Topic::Unknown));
        assert_eq!(resolve("номера!"), Action::SendCatalog(Topic::Unknown));
        assert_eq!(resolve(""), Action::SendCatalog(Topic::Unknown));
    }

    #[test]
    fn operator_and_special_replies() {
        assert_eq!(resolve("Оператор"), Action::SendOperatorAck);
        assert_eq!(resolve("поддержка"), Action::SendOperatorAck);
        assert_eq!(resolve("трансфер"), Action::Reply(NO_TRANSFER));
    }

    #[test]
    fn topic_aliases_resolve() {
        assert_eq!(resolve("Номерной фонд"), Action::SendCatalog(Topic::Rooms));
        assert_eq!(resolve("HELP"), Action::SendCatalog(Topic::Help));
        assert_eq!(resolve("заказать"), Action::SendCatalog(Topic::Booking));
        assert_eq!(resolve("как добраться"), Action::SendCatalog(Topic::Directions));
    }
}
