//! Bilingual UI labels for the chat panel.

use faq::Lang;

/// Fixed UI string, rendered in the active language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Title,
    Placeholder,
    Send,
    Language,
    English,
    Hindi,
    Minimize,
    Open,
    Typing,
    ErrorPrefix,
    Retry,
    QuickTips,
}

impl Label {
    pub const ALL: [Label; 12] = [
        Label::Title,
        Label::Placeholder,
        Label::Send,
        Label::Language,
        Label::English,
        Label::Hindi,
        Label::Minimize,
        Label::Open,
        Label::Typing,
        Label::ErrorPrefix,
        Label::Retry,
        Label::QuickTips,
    ];

    #[must_use]
    pub fn text(self, lang: Lang) -> &'static str {
        let (en, hi) = match self {
            Self::Title => ("Ask VEDA", "वेदा से पूछें"),
            Self::Placeholder => ("Type your question...", "अपना प्रश्न लिखें..."),
            Self::Send => ("Send", "भेजें"),
            Self::Language => ("Language", "भाषा"),
            Self::English => ("English", "अंग्रेज़ी"),
            Self::Hindi => ("Hindi", "हिन्दी"),
            Self::Minimize => ("Hide", "छुपाएं"),
            Self::Open => ("Open", "खोलें"),
            Self::Typing => ("Typing...", "लिख रहा है..."),
            Self::ErrorPrefix => ("Error:", "त्रुटि:"),
            Self::Retry => ("Retry", "फिर कोशिश करें"),
            Self::QuickTips => ("Quick tips:", "त्वरित सुझाव:"),
        };
        match lang {
            Lang::En => en,
            Lang::Hi => hi,
        }
    }

    /// Label naming `lang` in a language picker.
    #[must_use]
    pub fn language_name(lang: Lang) -> Self {
        match lang {
            Lang::En => Self::English,
            Lang::Hi => Self::Hindi,
        }
    }
}

#[cfg(test)]
#[path = "labels_test.rs"]
mod tests;
