use crate::error::Error;
use crate::loader;
use crate::model::instance::Availability;

const REPARTITION: &str = "\
Titre,Compositeur,Arrangeur,Durée,Style,Notes,Violon,Piano
Danse Macabre,Saint-Saëns,,,,,\"alice, bob\",carol
,,,,,,dave,
Pavane,Fauré,,,,,,
Boléro,Ravel,,,,,\"bob , ,alice\",
";

const BY_NAME: &str = "\
Nom,Email,lun. 5 10:00-12:00,lun. 5 14:00-16:00,mar. 6 10:00-12:00
alice,a@example.com,yes,no,maybe
bob,b@example.com,oui,peut-être,non
carol,c@example.com,,yes,
";

#[test]
fn test_by_name_shape() {
    let instance =
        loader::load_from_readers(Some(REPARTITION.as_bytes()), BY_NAME.as_bytes()).unwrap();

    // Musicians come from the repartition table, title-cased and sorted.
    let names: Vec<&str> = instance.musicians().iter().map(AsRef::as_ref).collect();
    assert_eq!(names, ["Alice", "Bob", "Carol"]);

    // Blank titles and musician-less rows are skipped; names deduplicate.
    let titles: Vec<&str> = instance
        .pieces()
        .iter()
        .map(|p| p.title.as_ref())
        .collect();
    assert_eq!(titles, ["Danse Macabre", "Boléro"]);
    assert_eq!(instance.pieces()[0].members.len(), 3);
    assert_eq!(instance.pieces()[1].members.len(), 2);

    // Slots are globally ordered and indexed.
    let ids: Vec<&str> = instance.slots().iter().map(|s| s.id.as_ref()).collect();
    assert_eq!(
        ids,
        [
            "LUN_05_10:00-12:00",
            "LUN_05_14:00-16:00",
            "MAR_06_10:00-12:00",
        ]
    );
    assert_eq!(instance.slot_index("MAR_06_10:00-12:00"), Some(2));

    let alice = instance
        .musicians()
        .iter()
        .position(|m| m.as_ref() == "Alice")
        .unwrap();
    let bob = instance
        .musicians()
        .iter()
        .position(|m| m.as_ref() == "Bob")
        .unwrap();
    let carol = instance
        .musicians()
        .iter()
        .position(|m| m.as_ref() == "Carol")
        .unwrap();
    assert_eq!(instance.availability(alice, 0), Availability::Yes);
    assert_eq!(instance.availability(alice, 1), Availability::No);
    assert_eq!(instance.availability(alice, 2), Availability::Maybe);
    // French answers normalize the same way.
    assert_eq!(instance.availability(bob, 0), Availability::Yes);
    assert_eq!(instance.availability(bob, 1), Availability::Maybe);
    assert_eq!(instance.availability(bob, 2), Availability::No);
    // Blank cells default to "no".
    assert_eq!(instance.availability(carol, 0), Availability::No);
    assert_eq!(instance.availability(carol, 1), Availability::Yes);
}

#[test]
fn test_malformed_headers_are_skipped_not_fatal() {
    let table = "\
Nom,Email,lun. 5 10:00-12:00,pas un créneau,mar. 6 10:00-12:00
alice,a@example.com,yes,yes,yes
";
    let repartition = "\
Titre,A,B,C,D,E,Violon
Pièce,,,,,,alice
";
    let instance =
        loader::load_from_readers(Some(repartition.as_bytes()), table.as_bytes()).unwrap();
    assert_eq!(instance.slots().len(), 2);
    assert_eq!(instance.diagnostics.len(), 1);
    assert!(instance.diagnostics[0].contains("pas un créneau"));
}

#[test]
fn test_embedded_shape_and_synthesis_fallback() {
    // Slot labels live in body cells; musician rows carry an email in the
    // second column and answers aligned with the label sequence.
    let table = "\
Planning,,,,
,,\"lun. 5\n10:00-12:00\",lun. 5 14:00-16:00,lun. 12 10:00-12:00
,,,,
,,,,
,,,,
alice,alice@example.com,yes,no,maybe
bob,bob@example.com,maybe,yes,
not a musician,,yes,yes,yes
";
    let instance = loader::load_from_readers(None::<&[u8]>, table.as_bytes()).unwrap();

    // No repartition table: a catch-all piece is synthesized.
    assert_eq!(instance.pieces().len(), 1);
    assert_eq!(instance.pieces()[0].title.as_ref(), "Session_Planning");
    assert_eq!(instance.pieces()[0].members.len(), 2);

    let names: Vec<&str> = instance.musicians().iter().map(AsRef::as_ref).collect();
    assert_eq!(names, ["Alice", "Bob"]);

    let ids: Vec<&str> = instance.slots().iter().map(|s| s.id.as_ref()).collect();
    assert_eq!(
        ids,
        [
            "LUN_05_10:00-12:00",
            "LUN_05_14:00-16:00",
            "LUN_12_10:00-12:00",
        ]
    );
    // Dates 5 and 12 span two weeks.
    assert_eq!(instance.weeks(), [1, 2]);

    let alice = 0;
    let bob = 1;
    assert_eq!(instance.availability(alice, 0), Availability::Yes);
    assert_eq!(instance.availability(alice, 1), Availability::No);
    assert_eq!(instance.availability(alice, 2), Availability::Maybe);
    assert_eq!(instance.availability(bob, 0), Availability::Maybe);
    assert_eq!(instance.availability(bob, 1), Availability::Yes);
    // Missing trailing answer defaults to "no".
    assert_eq!(instance.availability(bob, 2), Availability::No);
}

#[test]
fn test_unrecognized_shape_is_fatal() {
    let table = "\
a,b,c
1,2,3
";
    let result = loader::load_from_readers(None::<&[u8]>, table.as_bytes());
    assert!(matches!(result, Err(Error::InputShape(_))));
}

#[test]
fn test_no_musicians_is_fatal() {
    // Valid headers but no respondent rows and no repartition.
    let table = "\
Nom,Email,lun. 5 10:00-12:00
";
    let result = loader::load_from_readers(None::<&[u8]>, table.as_bytes());
    match result {
        Err(Error::InputShape(message)) => assert!(message.contains("musicians")),
        other => panic!("expected InputShape, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_no_slots_is_fatal() {
    let repartition = "\
Titre,A,B,C,D,E,Violon
Pièce,,,,,,alice
";
    let table = "\
Nom,Email,rien,nada
alice,a@example.com,yes,yes
";
    let result = loader::load_from_readers(Some(repartition.as_bytes()), table.as_bytes());
    match result {
        Err(Error::InputShape(message)) => assert!(message.contains("slots")),
        other => panic!("expected InputShape, got {:?}", other.map(|_| ())),
    }
}
