//! Edge-case coverage for the mask styles and the facade.
//!
//! These tests focus on Unicode scalar values (multi-byte characters and
//! combining marks), boundary lengths, and masked fields holding unusual
//! values.

use fieldmask::{MaskChar, MaskStyle, MaskingPolicy, MaskingService, DEFAULT_MASK_CHAR};
use serde::Serialize;

#[test]
fn documented_examples() {
    assert_eq!(
        MaskStyle::Partial.apply("alice@example.com", '*'),
        "alic*************"
    );
    assert_eq!(
        MaskStyle::ShowLast.apply("4111111111111111", '*'),
        "************1111"
    );
    assert_eq!(MaskStyle::Full.apply("x", '#'), "#");

    let disabled = MaskingService::new(MaskingPolicy::new().with_enabled(false));
    assert_eq!(disabled.mask("sensitive"), "sensitive");
}

#[test]
fn length_is_preserved_for_every_style_and_length() {
    for len in 0..40 {
        let value: String = "abcdefghij".chars().cycle().take(len).collect();
        for style in MaskStyle::ALL {
            let masked = style.apply(&value, DEFAULT_MASK_CHAR);
            assert_eq!(masked.chars().count(), len, "{style} at length {len}");
        }
    }
}

#[test]
fn partial_prefix_and_show_last_suffix_hold() {
    for len in 3..40 {
        let value: String = "0123456789".chars().cycle().take(len).collect();

        let partial = MaskStyle::Partial.apply(&value, '*');
        let visible = (len / 4).max(1);
        assert_eq!(partial[..visible], value[..visible]);
        assert!(partial[visible..].chars().all(|c| c == '*'));

        let show_last = MaskStyle::ShowLast.apply(&value, '*');
        let hidden = len - 4.min(len);
        assert!(show_last[..hidden].chars().all(|c| c == '*'));
        assert_eq!(show_last[hidden..], value[hidden..]);
    }
}

#[test]
fn short_values() {
    assert_eq!(MaskStyle::Partial.apply("a", '*'), "*");
    assert_eq!(MaskStyle::Partial.apply("ab", '*'), "**");
    assert_eq!(MaskStyle::ShowLast.apply("abcd", '*'), "abcd");
    assert_eq!(MaskStyle::ShowLast.apply("abcde", '*'), "*bcde");
}

#[test]
fn multibyte_characters_count_once() {
    let chinese = "秘密数据";
    assert_eq!(MaskStyle::Partial.apply(chinese, '*'), "秘***");
    assert_eq!(MaskStyle::ShowLast.apply("机密秘密数据", '*'), "**秘密数据");
    assert_eq!(MaskStyle::Full.apply(chinese, '*'), "****");
}

#[test]
fn emoji_and_multibyte_mask_characters() {
    assert_eq!(MaskStyle::ShowLast.apply("secret🔒data", '*'), "*******data");
    assert_eq!(MaskStyle::Full.apply("abc", '•'), "•••");
    assert_eq!(MaskStyle::Partial.apply("🔒🔒🔒🔒", '█'), "🔒███");
}

#[test]
fn combining_marks_are_separate_scalars() {
    // "cafe" + U+0301 is five scalar values.
    assert_eq!(MaskStyle::Partial.apply("cafe\u{0301}", '*'), "c****");
}

#[test]
fn very_long_value() {
    let long = "x".repeat(100_000);
    let masked = MaskStyle::ShowLast.apply(&long, '*');
    assert_eq!(masked.len(), 100_000);
    assert!(masked.starts_with(&"*".repeat(99_996)));
    assert!(masked.ends_with("xxxx"));
}

#[test]
fn facade_mask_with_explicit_arguments() {
    let service = MaskingService::new(MaskingPolicy::new().with_mask_char('#'));
    assert_eq!(service.mask("abcdefgh"), "ab######");
    assert_eq!(
        service.mask_with("abcdefgh", MaskStyle::ShowLast, MaskChar::Inherit),
        "####efgh"
    );
    assert_eq!(
        service.mask_with("abcdefgh", MaskStyle::Full, MaskChar::Char('x')),
        "xxxxxxxx"
    );
    assert_eq!(service.mask(""), "");
    assert_eq!(service.mask_option(None), None);
}

#[test]
fn masked_boolean_and_char_fields_become_text() {
    #[derive(Serialize, Debug)]
    struct Flags {
        secret_flag: bool,
        initial: char,
    }

    let service = MaskingService::new(
        MaskingPolicy::new()
            .with_fields(["secret_flag", "initial"])
            .with_style(MaskStyle::Full),
    );
    let json = service.to_masked_json(&Flags {
        secret_flag: true,
        initial: 'J',
    });
    assert_eq!(json, r#"{"secret_flag":"****","initial":"*"}"#);
}

#[test]
fn masked_unit_variant_uses_variant_name() {
    #[derive(Serialize, Debug)]
    enum Tier {
        Platinum,
    }

    #[derive(Serialize, Debug)]
    struct Member {
        tier: Tier,
    }

    let service = MaskingService::new(
        MaskingPolicy::new()
            .with_fields(["tier"])
            .with_style(MaskStyle::ShowLast),
    );
    assert_eq!(
        service.to_masked_json(&Member {
            tier: Tier::Platinum
        }),
        r#"{"tier":"****inum"}"#
    );
}

#[test]
fn masked_nested_object_is_masked_as_one_text() {
    #[derive(Serialize, Debug)]
    struct Address {
        street: String,
    }

    #[derive(Serialize, Debug)]
    struct Person {
        address: Address,
    }

    let service = MaskingService::new(
        MaskingPolicy::new()
            .with_fields(["address"])
            .with_style(MaskStyle::Full),
    );
    let json = service.to_masked_json(&Person {
        address: Address {
            street: "Main".into(),
        },
    });
    // `{"street":"Main"}` is 17 characters.
    assert_eq!(json, format!(r#"{{"address":"{}"}}"#, "*".repeat(17)));
}

#[test]
fn service_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MaskingService>();

    let service = std::sync::Arc::new(MaskingService::new(
        MaskingPolicy::new().with_fields(["email"]),
    ));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = std::sync::Arc::clone(&service);
            std::thread::spawn(move || service.mask(&format!("user{i}@example.com")).into_owned())
        })
        .collect();
    for handle in handles {
        let masked = handle.join().unwrap();
        assert!(masked.ends_with("*********"));
    }
}
