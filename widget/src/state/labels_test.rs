use super::*;

#[test]
fn title_in_both_languages() {
    assert_eq!(Label::Title.text(Lang::En), "Ask VEDA");
    assert_eq!(Label::Title.text(Lang::Hi), "वेदा से पूछें");
}

#[test]
fn every_label_has_distinct_non_empty_text() {
    for label in Label::ALL {
        let en = label.text(Lang::En);
        let hi = label.text(Lang::Hi);
        assert!(!en.is_empty() && !hi.is_empty(), "{label:?}");
        assert_ne!(en, hi, "{label:?} is untranslated");
    }
}

#[test]
fn language_names_follow_display_language() {
    assert_eq!(Label::language_name(Lang::Hi).text(Lang::En), "Hindi");
    assert_eq!(Label::language_name(Lang::En).text(Lang::Hi), "अंग्रेज़ी");
}
