use crate::field::Field;
use crate::mask::{
    ConfigError, KeyState, MaskConfig, MaskEvent, MaskState, PhoneMask, KEY_BACKSPACE,
};
use crate::script::{parse_script, run_script};
use crate::template::TemplateError;

fn fill(template: &str, digits: &str) -> String {
    let mut stream = digits.chars();
    template
        .chars()
        .map(|c| match c {
            '_' => stream.next().unwrap_or('_'),
            other => other,
        })
        .collect()
}

fn typed(mask: &PhoneMask, digits: &str) -> Vec<String> {
    let mut field = Field::new(mask);
    field.focus();
    digits
        .chars()
        .map(|ch| {
            assert!(field.type_char(ch));
            field.value().to_string()
        })
        .collect()
}

#[test]
fn typing_digits_fills_template_progressively() {
    let mask = PhoneMask::default();
    assert_eq!(
        typed(&mask, "9123456789"),
        vec![
            "+7 (9",
            "+7 (91",
            "+7 (912) ",
            "+7 (912) 3",
            "+7 (912) 34",
            "+7 (912) 345 ",
            "+7 (912) 345 6",
            "+7 (912) 345 67",
            "+7 (912) 345 678",
            "+7 (912) 345 6789",
        ]
    );
}

#[test]
fn full_rendering_matches_template_for_every_prefix() {
    let mask = PhoneMask::default();
    let digits = "9123456789";
    for n in 0..=digits.len() {
        let d = &digits[..n];
        let mut field = Field::new(&mask);
        field.focus();
        field.type_str(d);
        let rendering = mask.render(&mask.digits(field.value()));
        assert_eq!(rendering.full, fill("+7 (___) ___ ____", d), "prefix {d:?}");
        assert_eq!(rendering.consumed, n);
    }
}

#[test]
fn digits_past_capacity_are_dropped() {
    let mask = PhoneMask::default();
    let values = typed(&mask, "91234567890");
    assert_eq!(values.last().map(String::as_str), Some("+7 (912) 345 6789"));
    assert_eq!(mask.format("912345678901234"), "+7 (912) 345 6789");
}

#[test]
fn rendering_round_trips_digit_stream() {
    let mask = PhoneMask::default();
    for d in ["", "9", "91", "912345", "7777777777", "0000000000", "9123456789"] {
        assert_eq!(mask.digits(&mask.render(d).full), d);
    }
}

#[test]
fn backspace_inside_prefix_is_a_no_op() {
    let mask = PhoneMask::default();
    let mut keys = KeyState::default();
    for cursor in 0..3 {
        let masked = mask.apply(
            MaskEvent::keydown(KEY_BACKSPACE),
            "+7 (912",
            cursor,
            &mut keys,
        );
        assert_eq!(masked.value, "+7 (912");
        assert!(masked.suppress_default);
    }

    let mut field = Field::with_value(&mask, "+7 (912");
    field.set_cursor(2);
    assert!(!field.backspace());
    assert!(!field.backspace());
    assert_eq!(field.value(), "+7 (912");
}

#[test]
fn backspace_never_erodes_the_prefix() {
    let mask = PhoneMask::default();
    let mut field = Field::with_value(&mask, "+7 (9");
    assert!(field.backspace());
    assert_eq!(field.value(), "+7 ");
    for _ in 0..5 {
        field.backspace();
        assert_eq!(field.value(), "+7 ");
    }
}

#[test]
fn backspace_walks_back_through_formatting() {
    let mask = PhoneMask::default();
    let mut field = Field::new(&mask);
    field.focus();
    field.type_str("9123");
    assert_eq!(field.value(), "+7 (912) 3");
    assert!(field.backspace());
    assert_eq!(field.value(), "+7 (912) ");
    assert!(field.backspace());
    assert_eq!(field.value(), "+7 (912)");
    assert!(field.backspace());
    assert_eq!(field.value(), "+7 (912");
}

#[test]
fn blur_keeps_long_values_and_clears_short_ones() {
    let mask = PhoneMask::default();
    let mut keys = KeyState::default();
    assert_eq!(
        mask.apply(MaskEvent::blur(), "+7 (91", 6, &mut keys).value,
        "+7 (91"
    );
    assert_eq!(mask.apply(MaskEvent::blur(), "+7 (", 4, &mut keys).value, "");
    assert_eq!(mask.apply(MaskEvent::blur(), "+7 ", 3, &mut keys).value, "");
    assert_eq!(mask.apply(MaskEvent::blur(), "", 0, &mut keys).value, "");
}

#[test]
fn blur_after_digit_keystroke_leaves_value_alone() {
    let mask = PhoneMask::default();
    let mut field = Field::new(&mask);
    field.focus();
    field.type_str("91");
    field.blur();
    assert_eq!(field.value(), "+7 (91");
}

#[test]
fn focus_then_blur_without_typing_clears_field() {
    let mask = PhoneMask::default();
    let mut field = Field::new(&mask);
    field.focus();
    assert_eq!(field.value(), "+7 ");
    field.blur();
    assert_eq!(field.value(), "");
    assert_eq!(field.state(), MaskState::Empty);
}

#[test]
fn non_digit_keys_are_dropped() {
    let mask = PhoneMask::default();
    let mut field = Field::new(&mask);
    field.focus();
    assert_eq!(field.type_str("9a-1"), 4);
    assert_eq!(field.value(), "+7 (91");
}

#[test]
fn paste_reformats_in_one_step() {
    let mask = PhoneMask::default();

    let mut field = Field::new(&mask);
    field.focus();
    assert!(field.paste("9123456789"));
    assert_eq!(field.value(), "+7 (912) 345 6789");

    let mut field = Field::new(&mask);
    field.focus();
    field.paste("(912) 345-67-89");
    assert_eq!(field.value(), "+7 (912) 345 6789");
    assert_eq!(field.state(), MaskState::Complete);
}

#[test]
fn overlong_value_is_clipped_on_input() {
    let mask = PhoneMask::default();
    let mut keys = KeyState::default();
    let masked = mask.apply(MaskEvent::input(), "+7 (912) 345 678901", 19, &mut keys);
    assert_eq!(masked.value, "+7 (912) 345 6789");
}

#[test]
fn well_formed_value_survives_non_digit_events() {
    let mask = PhoneMask::default();
    let mut keys = KeyState::default();
    let masked = mask.apply(MaskEvent::focus(), "+7 (912) 34", 11, &mut keys);
    assert_eq!(masked.value, "+7 (912) 34");
    assert!(!masked.suppress_default);
}

#[test]
fn states_follow_the_digit_stream() {
    let mask = PhoneMask::default();
    assert_eq!(mask.state(""), MaskState::Empty);
    assert_eq!(mask.state("+7 "), MaskState::Incomplete);
    assert_eq!(mask.state("+7 (912) 345 678"), MaskState::Incomplete);
    assert_eq!(mask.state("+7 (912) 345 6789"), MaskState::Complete);
}

#[test]
fn us_preset_formats_with_dash() {
    let mask = PhoneMask::new(MaskConfig::for_template("+1 (___) ___-____")).unwrap();
    let mut field = Field::new(&mask);
    field.focus();
    assert_eq!(field.value(), "+1 ");
    field.type_str("2125551234");
    assert_eq!(field.value(), "+1 (212) 555-1234");
}

#[test]
fn interleaved_literal_digits_pass_through() {
    let mask = PhoneMask::new(MaskConfig::for_template("+1 (___) 555-____")).unwrap();
    assert_eq!(mask.capacity(), 7);
    assert_eq!(mask.render("2121234").full, "+1 (212) 555-1234");
    assert_eq!(mask.digits("+1 (212) 555-1234"), "2121234");

    let mut field = Field::new(&mask);
    field.focus();
    field.type_str("2121234");
    assert_eq!(field.value(), "+1 (212) 555-1234");
}

#[test]
fn custom_placeholder_character() {
    let mask = PhoneMask::new(MaskConfig::for_template_with("+7 (###) ###-##-##", '#')).unwrap();
    assert_eq!(mask.format("9123456789"), "+7 (912) 345-67-89");
    assert_eq!(mask.format("91"), "+7 (91");
}

#[test]
fn template_without_placeholder_is_rejected() {
    let err = PhoneMask::new(MaskConfig::for_template("+7 (999) 999 9999")).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Template(TemplateError::NoPlaceholder { .. })
    ));
}

#[test]
fn phone_mask_is_shareable_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PhoneMask>();
}

#[test]
fn script_replay_records_each_step() {
    let mask = PhoneMask::default();
    let actions = parse_script("focus; type 912; bs; bs; home; bs; blur").unwrap();
    let records = run_script(&mask, &actions);
    let values: Vec<&str> = records.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(
        values,
        vec!["+7 ", "+7 (912) ", "+7 (912)", "+7 (912", "+7 (912", "+7 (912", "+7 (912"]
    );
    assert_eq!(records[4].cursor, 0);
    assert!(records[5].suppressed);
    assert!(!records[6].suppressed);
    assert_eq!(records[6].state, MaskState::Incomplete);
    assert_eq!(records[1].action, "type 912");
}

#[test]
fn widest_min_len_still_accepts_typing() {
    let mask = PhoneMask::new(MaskConfig {
        min_len: 5,
        ..MaskConfig::default()
    })
    .unwrap();
    let mut field = Field::new(&mask);
    field.focus();
    assert_eq!(field.type_str("9123"), 4);
    assert_eq!(field.value(), "+7 (912) 3");

    let err = PhoneMask::new(MaskConfig {
        min_len: 6,
        ..MaskConfig::default()
    })
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MinPastFirstSlot { min_len: 6, max: 5 }
    ));
}

#[test]
fn derived_guards_are_always_accepted() {
    for template in ["+7 (___) ___ ____", "+1 (___) 555-____", "+49 ____ _______", "(___) ___-____"] {
        let mask = PhoneMask::new(MaskConfig::for_template(template)).unwrap();
        let mut field = Field::new(&mask);
        field.focus();
        field.type_str("9");
        assert!(mask.digits(field.value()).starts_with('9'), "{template}");
    }
}
