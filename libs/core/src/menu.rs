use crate::catalog::Topic;

/// One button of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub topic: Topic,
}

/// Main menu in presentation order. Numeric shortcuts are derived from the
/// position in this list, so reordering here reorders the digits too.
pub const MAIN_MENU: [MenuItem; 6] = [
    MenuItem {
        label: "🔔 Важная информация",
        topic: Topic::Rules,
    },
    MenuItem {
        label: "🛏️ Номерной фонд",
        topic: Topic::Rooms,
    },
    MenuItem {
        label: "🚣 Развлечения",
        topic: Topic::Activities,
    },
    MenuItem {
        label: "📍 На территории",
        topic: Topic::Grounds,
    },
    MenuItem {
        label: "📞 Контакты",
        topic: Topic::Contacts,
    },
    MenuItem {
        label: "🚗 Как добраться",
        topic: Topic::Directions,
    },
];

/// Button labels in presentation order.
pub fn labels() -> [&'static str; 6] {
    MAIN_MENU.map(|item| item.label)
}

/// Topic behind the 1-based menu position `position`.
pub fn topic_at(position: usize) -> Option<Topic> {
    position
        .checked_sub(1)
        .and_then(|index| MAIN_MENU.get(index))
        .map(|item| item.topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        assert_eq!(topic_at(0), None);
        assert_eq!(topic_at(1), Some(Topic::Rules));
        assert_eq!(topic_at(6), Some(Topic::Directions));
        assert_eq!(topic_at(7), None);
    }

    #[test]
    fn labels_follow_menu_order() {
        let labels = labels();
        for (index, item) in MAIN_MENU.iter().enumerate() {
            assert_eq!(labels[index], item.label);
        }
    }
}
