/// One parsed, validated CSV row representing a clickable menu leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub main_menu: String,
    pub sub_menu: String,
    pub label: String,
    pub content: String,
}

impl MenuEntry {
    /// Builds an entry from one CSV record.
    ///
    /// Returns None unless the record has exactly four fields with the
    /// main menu, label and content non-empty after trimming. The sub
    /// menu may be empty.
    pub fn from_record(fields: &[String]) -> Option<Self> {
        let [main_menu, sub_menu, label, content] = fields else {
            return None;
        };

        let main_menu = main_menu.trim();
        let sub_menu = sub_menu.trim();
        let label = label.trim();
        let content = content.trim();

        if main_menu.is_empty() || label.is_empty() || content.is_empty() {
            return None;
        }

        Some(Self {
            main_menu: main_menu.to_string(),
            sub_menu: sub_menu.to_string(),
            label: label.to_string(),
            content: content.to_string(),
        })
    }
}
