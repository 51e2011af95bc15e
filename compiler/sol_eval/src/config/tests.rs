use pretty_assertions::assert_eq;

use super::*;

#[test]
fn defaults() {
    let config = Configuration::default();
    assert_eq!(config.prec, 165);
    assert_eq!(config.points, 501);
    assert_eq!(config.display, DisplayMode::Decimal);
    assert!(config.autosimplify);
    assert!(!config.die_on_error);
    let mut expected = Float::with_val(53, 1);
    expected >>= 100u32;
    assert_eq!(config.diam, expected);
}

#[test]
fn every_setting_reads_back_what_was_applied() {
    let mut config = Configuration::default();
    for setting in Setting::ALL {
        let value = config.value_of(setting);
        config
            .apply(setting, &value)
            .unwrap_or_else(|e| panic!("{}: {e}", setting.name()));
    }
    assert_eq!(config, Configuration::default());
}

#[test]
fn precision_below_minimum_is_rejected() {
    let mut config = Configuration::default();
    let err = config.apply(Setting::Prec, &Thing::integer(5));
    assert!(matches!(err, Err(SettingError::OutOfRange { .. })));
    assert_eq!(config.prec, 165);
}

#[test]
fn flags_accept_keywords_and_booleans() {
    let mut config = Configuration::default();
    assert_eq!(config.apply(Setting::Timing, &Thing::Keyword(Keyword::On)), Ok(()));
    assert!(config.timing);
    assert_eq!(config.apply(Setting::Timing, &Thing::Boolean(false)), Ok(()));
    assert!(!config.timing);
    assert!(config.apply(Setting::Timing, &Thing::integer(1)).is_err());
}

#[test]
fn echo_messages_reflect_the_new_value() {
    let mut config = Configuration::default();
    assert_eq!(config.apply(Setting::Prec, &Thing::integer(200)), Ok(()));
    assert_eq!(config.describe(Setting::Prec), "The precision has been set to 200 bits.");
}
