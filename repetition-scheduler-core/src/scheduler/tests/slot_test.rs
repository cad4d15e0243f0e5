use crate::scheduler::slot::{normalize_special_slot, week_of, Day, Slot};

#[test]
fn test_canonical_round_trip() {
    for id in [
        "LUN_05_14:00-16:00",
        "MAR_06_08:30-10:00",
        "DIM_28_09:15-11:45",
    ] {
        let slot = Slot::parse(id).expect("canonical id must parse");
        assert_eq!(slot.id.as_ref(), id);
    }
}

#[test]
fn test_parse_rejects_malformed_ids() {
    assert!(Slot::parse("XXX_05_14:00-16:00").is_none());
    assert!(Slot::parse("LUN_05").is_none());
    assert!(Slot::parse("LUN_05_14:00-16:00_extra").is_none());
    assert!(Slot::parse("LUN_ab_14:00-16:00").is_none());
    assert!(Slot::parse("LUN_05_14h00-16h00").is_none());
}

#[test]
fn test_parse_fields() {
    let slot = Slot::parse("VEN_12_18:30-20:00").unwrap();
    assert_eq!(slot.day, Day::Ven);
    assert_eq!(slot.date, 12);
    assert_eq!(slot.start_hour, 18);
    assert_eq!(slot.start_minute, 30);
    assert_eq!(slot.end_hour, 20);
    assert_eq!(slot.end_minute, 0);
}

#[test]
fn test_label_grammar() {
    let slot = Slot::from_label("lun. 5 10:00-12:00").unwrap();
    assert_eq!(slot.id.as_ref(), "LUN_05_10:00-12:00");

    // Arbitrary text between date and times, spaces around the dash.
    let slot = Slot::from_label("Disponibilités mer. 14 sept 9:00 - 11:30").unwrap();
    assert_eq!(slot.id.as_ref(), "MER_14_09:00-11:30");

    // Dot after the day prefix is optional, case is ignored.
    let slot = Slot::from_label("Mar 12 8:00-10:00").unwrap();
    assert_eq!(slot.id.as_ref(), "MAR_12_08:00-10:00");

    // Embedded newlines are part of real header cells.
    let slot = Slot::from_label("ven. 7\n16:00-18:00").unwrap();
    assert_eq!(slot.id.as_ref(), "VEN_07_16:00-18:00");
}

#[test]
fn test_label_grammar_rejects_incomplete_labels() {
    assert!(Slot::from_label("lun. 5").is_none());
    assert!(Slot::from_label("10:00-12:00").is_none());
    assert!(Slot::from_label("lun. 10:00-12:00").is_none());
    assert!(Slot::from_label("quelque chose d'autre").is_none());
    assert!(Slot::from_label("").is_none());
}

#[test]
fn test_global_ordering() {
    let mut slots = vec![
        Slot::parse("MAR_06_10:00-12:00").unwrap(),
        Slot::parse("LUN_05_14:00-16:00").unwrap(),
        Slot::parse("LUN_05_10:00-12:00").unwrap(),
        Slot::parse("LUN_12_08:00-10:00").unwrap(),
    ];
    slots.sort_by_key(Slot::sort_key);
    let ids: Vec<&str> = slots.iter().map(|s| s.id.as_ref()).collect();
    assert_eq!(
        ids,
        [
            "LUN_05_10:00-12:00",
            "LUN_05_14:00-16:00",
            "MAR_06_10:00-12:00",
            "LUN_12_08:00-10:00",
        ]
    );
}

#[test]
fn test_display_pair() {
    let slot = Slot::parse("LUN_05_14:00-16:00").unwrap();
    assert_eq!(slot.display_day(), "Lundi 05");
    assert_eq!(slot.display_hours(), "14:00-16:00");
}

#[test]
fn test_day_tables() {
    assert_eq!(Day::Lun.order(), 1);
    assert_eq!(Day::Dim.order(), 7);
    assert_eq!(Day::Mer.code(), "MER");
    assert_eq!(Day::Jeu.name(), "Jeudi");
    assert_eq!(Day::from_code("SAM"), Some(Day::Sam));
    assert_eq!(Day::from_code("sam"), None);
    assert_eq!(Day::from_name("Vendredi"), Some(Day::Ven));
    assert_eq!(Day::from_name("ven"), Some(Day::Ven));
}

#[test]
fn test_special_slot_aliases() {
    // Canonical form passes through.
    assert_eq!(
        normalize_special_slot("LUN_04_16:00-18:00").as_deref(),
        Some("LUN_04_16:00-18:00")
    );
    // Shorthand: hours on the dot, zero-padded on the way out.
    assert_eq!(
        normalize_special_slot("LUN_4_16_18").as_deref(),
        Some("LUN_04_16:00-18:00")
    );
    // Free form with a case-insensitive day name.
    assert_eq!(
        normalize_special_slot("lundi 04 16:00-18:00").as_deref(),
        Some("LUN_04_16:00-18:00")
    );
    assert_eq!(
        normalize_special_slot("Mercredi 12 14:00-16:00").as_deref(),
        Some("MER_12_14:00-16:00")
    );
}

#[test]
fn test_special_slot_rejects_garbage() {
    assert!(normalize_special_slot("LUN_04").is_none());
    assert!(normalize_special_slot("NOPE_04_16:00-18:00").is_none());
    assert!(normalize_special_slot("Lundi seize heures").is_none());
    assert!(normalize_special_slot("").is_none());
}

#[test]
fn test_week_partitioning() {
    assert_eq!(week_of(5, 5), 1);
    assert_eq!(week_of(11, 5), 1);
    assert_eq!(week_of(12, 5), 2);
    assert_eq!(week_of(19, 5), 3);
}
