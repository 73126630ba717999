//! Pre-written replies, one per topic.

use serde::{Deserialize, Serialize};

/// Named entry in the reply catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Welcome,
    Rules,
    Rooms,
    Activities,
    Grounds,
    Contacts,
    Directions,
    Help,
    Operator,
    Booking,
    Unknown,
}

impl Topic {
    pub const ALL: [Topic; 11] = [
        Topic::Welcome,
        Topic::Rules,
        Topic::Rooms,
        Topic::Activities,
        Topic::Grounds,
        Topic::Contacts,
        Topic::Directions,
        Topic::Help,
        Topic::Operator,
        Topic::Booking,
        Topic::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Welcome => "welcome",
            Topic::Rules => "rules",
            Topic::Rooms => "rooms",
            Topic::Activities => "activities",
            Topic::Grounds => "grounds",
            Topic::Contacts => "contacts",
            Topic::Directions => "directions",
            Topic::Help => "help",
            Topic::Operator => "operator",
            Topic::Booking => "booking",
            Topic::Unknown => "unknown",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Topic::Welcome => WELCOME,
            Topic::Rules => RULES,
            Topic::Rooms => ROOMS,
            Topic::Activities => ACTIVITIES,
            Topic::Grounds => GROUNDS,
            Topic::Contacts => CONTACTS,
            Topic::Directions => DIRECTIONS,
            Topic::Help => HELP,
            Topic::Operator => OPERATOR,
            Topic::Booking => BOOKING,
            Topic::Unknown => UNKNOWN,
        }
    }
}

/// Reply to the `трансфер` command.
pub const NO_TRANSFER: &str = "🚖 *Трансфера у нас нет, просим добираться самостоятельно*";

/// Sent when handling a message failed internally.
pub const APOLOGY: &str =
    "❌ Произошла техническая ошибка. Попробуйте позже или напишите 'оператор'.";

const WELCOME: &str = "👋 *Здравствуйте! Добро пожаловать на базу отдыха у озера* 🌲🏡

Меня зовут Юлия, я с радостью помогу вам с подбором размещения.

📍 *Перед тем, как мы продолжим, обратите внимание на важную информацию:*

Выберите один из вариантов:";

const RULES: &str = "🔔 *Важная информация*

📌 Наша база расположена *на берегу озера* в *заповедной зоне*.

💧 *В целях сохранения экологии:*
• *Центральная канализация и водопровод отсутствуют*
• *Душа нет*, но есть прекрасные *русские бани на дровах* (как для помывки, так и для отдыха)
• *Удобства на улице*

🧻 Большой дачный туалет на территории
👶 Дети до 5 лет — бесплатно (если без отдельного спального места)

Если такие условия вас устраивают, давайте расскажу подробнее 😊

Для возврата в меню напишите *\"меню\"*";

const ROOMS: &str = "🛏️ *Номерной фонд*

🏠 *КОМФОРТ*
• Включено: постельное белье, посуда, кухня, мангал
• Без душа и туалета в домах (есть бани и удобства на улице)
• Примеры:
  - Дом №8 (4 чел.) — от *9999₽*
  - Дом №9/10 (6 чел.) — от *10999₽*
  - Дом №14 (до 10+ чел.) — от *21999₽*

🛏️ *ЭКОНОМ*
• 4 или 5 односпальных кроватей
• Без постельного белья и посуды (можно взять с собой или арендовать: *200₽/комплект*)
• Холодильник — уточняйте по каждой комнате
• Общая кухня на территории
• Примеры:
  - Комната в даче 1,2,4,11,13 (4 чел.) — от *4999₽*
  - Комната в даче 6 (5 чел.) — от *5499₽*

Для того, чтобы начать бронирование напишите *\"бронирование\"*
Для возврата в меню напишите *\"меню\"*";

const ACTIVITIES: &str = "🚣 *Развлечения*

🏖 *На территории:*
• Купание в озере
• Русская баня с парением и нырянием ❄️
• Прокат:
  - Сапборд — *1200₽/час*
  - Байдарка
  - Лодка

🍢 Большие мангальные зоны с лавками и столами включены в стоимость!

Для возврата в меню напишите *\"меню\"*";

const GROUNDS: &str = "📍 *На территории*

🍽️ *Удобства:*
• Общая кухня с газовыми плитами
• Парковка:
  - Легковой авто — *500₽/сутки*
  - Газель — *1000₽/сутки*
• Чистейшая родниковая вода из озера
• Запас питьевой воды, решётки и угли — берите с собой

Для возврата в меню напишите *\"меню\"*";

const CONTACTS: &str = "📞 *Контакты*

В случае если у вас остались вопросы можно писать в телеграм:
📱 https://t.me/Zolotye_peski174_bot

🌐 Подробности на сайте: https://bazaturgoyak.ru/

⏰ *Время работы:*
• Ежедневно: 9:00 - 21:00
• Экстренная связь: круглосуточно

Для возврата в меню напишите *\"меню\"*";

const DIRECTIONS: &str = "🚗 *Как добраться*

📍 Координаты: 55.1881079369311, 60.05969764417703.
https://yandex.ru/maps/?ll=60.061851%2C55.187183&mode=routes&rtext=~55.187969%2C60.059069&rtt=auto&ruri=~ymapsbm1%3A%2F%2Forg%3Foid%3D109014041624&source=serp_navig&z=15.3

🚙 Возможен заезд на автомобиле, парковка платная.

Для возврата в меню напишите *\"меню\"*";

const HELP: &str = "📋 *Помощь*

*Доступные команды:*
• *меню* - главное меню
• *информация* - важная информация
• *номера* - номерной фонд
• *развлечения* - что можно делать
• *территория* - что есть на базе
• *контакты* - как связаться
• *добраться* - как доехать
• *бронирование* - забронировать номер
• *помощь* - эта справка

Для связи с оператором напишите *\"оператор\"*";

const OPERATOR: &str = "👩‍💼 *Подключение к оператору*

Ваш запрос передан оператору.
Ожидайте ответа в течение 5-10 минут.

В рабочее время (9:00-21:00) ответим быстрее!

Для возврата в меню напишите *\"меню\"*";

const BOOKING: &str = "📋 *Бронирование номера*

Для бронирования:
1. Перейдите в наш Телеграм-бот - https://t.me/Zolotye_peski174_bot
2. Воспользуйтесь нашим сайтом - https://bazaturgoyak.ru/

Для возврата в меню напишите *\"меню\"*";

const UNKNOWN: &str = "❓ Не понимаю эту команду.

Напишите *\"помощь\"* для просмотра доступных команд.
Или напишите *\"меню\"* для возврата в главное меню.
Для связи с оператором напишите *\"оператор\"*.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_topic_has_text() {
        for topic in Topic::ALL {
            assert!(!topic.text().trim().is_empty(), "{}", topic.as_str());
        }
    }

    #[test]
    fn replies_point_back_to_menu() {
        for topic in [Topic::Rules, Topic::Rooms, Topic::Contacts, Topic::Booking] {
            assert!(topic.text().contains("\"меню\""), "{}", topic.as_str());
        }
    }

    #[test]
    fn apology_mentions_operator() {
        assert!(APOLOGY.contains("оператор"));
    }
}
