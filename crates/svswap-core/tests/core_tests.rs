use svswap_core::{
    Content, CoreError, XmlWriteOpts, apply_swap, find_one_child, load_save, locate_save_file,
    parse_document, read_roster, write_document, write_save_with_backup,
};

const SAVE_XML: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"utf-8\"?>",
    "<SaveGame xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" ",
    "xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\">",
    "<player><name>Alice</name><homeLocation>Farm</homeLocation>",
    "<money>5000</money></player>",
    "<farmhands>",
    "<Farmer><name>Bob</name><homeLocation>Beach</homeLocation></Farmer>",
    "<Farmer />",
    "</farmhands>",
    "<currentSeason>spring</currentSeason>",
    "</SaveGame>"
);

#[test]
fn find_one_child_basic() {
    let doc = parse_document(SAVE_XML).expect("parse");
    let player = find_one_child(&doc.root, "player", None).expect("player");
    assert_eq!(find_one_child(player, "name", None).unwrap().text(), Some("Alice"));

    match find_one_child(&doc.root, "locations", None) {
        Err(CoreError::ElementNotFound { tag, parent }) => {
            assert_eq!(tag, "locations");
            assert_eq!(parent, "SaveGame");
        }
        other => panic!("expected ElementNotFound, got {other:?}"),
    }
}

#[test]
fn find_one_child_rejects_duplicates() {
    let doc = parse_document("<SaveGame><farmhands /><farmhands /></SaveGame>").unwrap();
    match find_one_child(&doc.root, "farmhands", None) {
        Err(CoreError::DuplicateElement { tag, .. }) => assert_eq!(tag, "farmhands"),
        other => panic!("expected DuplicateElement, got {other:?}"),
    }
}

#[test]
fn find_one_child_attribute_filter() {
    let xml = concat!(
        "<locations>",
        "<GameLocation xsi:type=\"Beach\" />",
        "<GameLocation xsi:type=\"Farm\"><buildings /></GameLocation>",
        "<GameLocation />",
        "</locations>"
    );
    let doc = parse_document(xml).unwrap();
    // Unfiltered lookup is ambiguous; the filter narrows it to one.
    assert!(matches!(
        find_one_child(&doc.root, "GameLocation", None),
        Err(CoreError::DuplicateElement { .. })
    ));
    let farm = find_one_child(&doc.root, "GameLocation", Some(("xsi:type", "Farm"))).unwrap();
    assert!(find_one_child(farm, "buildings", None).is_ok());
    assert!(matches!(
        find_one_child(&doc.root, "GameLocation", Some(("xsi:type", "Desert"))),
        Err(CoreError::ElementNotFound { .. })
    ));
}

#[test]
fn roster_reports_occupancy_in_order() {
    let doc = parse_document(SAVE_XML).unwrap();
    let roster = read_roster(&doc).unwrap();
    assert_eq!(roster.player_name, "Alice");
    assert_eq!(
        roster.farmhand_names,
        vec![Some("Bob".to_string()), None]
    );
    let shown: Vec<(usize, &str)> = roster.occupied().collect();
    assert_eq!(shown, vec![(1, "Bob")]);
}

#[test]
fn roundtrip_compact_preserves_namespaces() {
    let doc = parse_document(SAVE_XML).unwrap();
    let ns: Vec<(&str, &str)> = doc
        .root
        .attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        ns,
        vec![
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ("xmlns:xsd", "http://www.w3.org/2001/XMLSchema"),
        ]
    );

    let written = write_document(&doc, XmlWriteOpts { pretty: false });
    assert!(written.contains(
        "<SaveGame xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\">"
    ));
    let reparsed = parse_document(&written).unwrap();
    assert_eq!(reparsed, doc);
}

#[test]
fn roundtrip_pretty_drops_only_indentation() {
    let doc = parse_document(SAVE_XML).unwrap();
    let pretty = write_document(&doc, XmlWriteOpts { pretty: true });
    assert!(pretty.contains("\n  <player>"));
    let reparsed = parse_document(&pretty).unwrap();
    assert_eq!(reparsed, doc);
}

#[test]
fn text_escaping_roundtrips() {
    let doc =
        parse_document("<SaveGame><player><name>A &amp; B &lt;3</name></player></SaveGame>")
            .unwrap();
    let player = find_one_child(&doc.root, "player", None).unwrap();
    let name = find_one_child(player, "name", None).unwrap();
    assert_eq!(name.text(), Some("A & B <3"));
    let written = write_document(&doc, XmlWriteOpts::default());
    assert!(written.contains("A &amp; B &lt;3"));
    assert_eq!(parse_document(&written).unwrap(), doc);
}

#[test]
fn whitespace_only_leaf_text_is_kept() {
    let doc = parse_document("<SaveGame>\n  <homeLocation> </homeLocation>\n</SaveGame>").unwrap();
    let home = find_one_child(&doc.root, "homeLocation", None).unwrap();
    assert_eq!(home.text(), Some(" "));
    // The indentation around <homeLocation> is gone.
    assert_eq!(doc.root.children.len(), 1);
}

#[test]
fn swap_moves_identity_and_home_location() {
    let mut doc = parse_document(SAVE_XML).unwrap();
    apply_swap(&mut doc, 0).expect("swap");

    // New player sits first under the root.
    let Content::Element(first) = &doc.root.children[0] else {
        panic!("first root child is not an element");
    };
    assert_eq!(first.name, "player");
    assert_eq!(find_one_child(first, "name", None).unwrap().text(), Some("Bob"));
    assert_eq!(
        find_one_child(first, "homeLocation", None).unwrap().text(),
        Some("Farm")
    );

    // The ex-player is appended after the untouched empty slot.
    let farmhands = find_one_child(&doc.root, "farmhands", None).unwrap();
    let slots: Vec<&svswap_core::Element> = farmhands.child_elements().collect();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].name, "Farmer");
    assert!(slots[0].children.is_empty());
    assert_eq!(slots[1].name, "Farmer");
    assert_eq!(find_one_child(slots[1], "name", None).unwrap().text(), Some("Alice"));
    assert_eq!(
        find_one_child(slots[1], "homeLocation", None).unwrap().text(),
        Some("Beach")
    );

    // Unrelated fields ride along with the moved records.
    assert_eq!(find_one_child(slots[1], "money", None).unwrap().text(), Some("5000"));
}

#[test]
fn swap_rejects_empty_and_out_of_range_slots() {
    let mut doc = parse_document(SAVE_XML).unwrap();
    let before = doc.clone();

    assert!(matches!(
        apply_swap(&mut doc, 1),
        Err(CoreError::EmptySlot { index: 1 })
    ));
    assert_eq!(doc, before);

    assert!(matches!(
        apply_swap(&mut doc, 7),
        Err(CoreError::SlotOutOfRange { index: 7, len: 2 })
    ));
    assert_eq!(doc, before);
}

#[test]
fn swap_requires_home_locations() {
    let xml = concat!(
        "<SaveGame><player><name>Alice</name></player>",
        "<farmhands><Farmer><name>Bob</name>",
        "<homeLocation>Beach</homeLocation></Farmer></farmhands></SaveGame>"
    );
    let mut doc = parse_document(xml).unwrap();
    let before = doc.clone();
    assert!(matches!(
        apply_swap(&mut doc, 0),
        Err(CoreError::ElementNotFound { .. })
    ));
    assert_eq!(doc, before);
}

#[test]
fn save_directory_contract() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("TestFarm_123456");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("TestFarm_123456"), SAVE_XML).unwrap();

    // Sentinel missing.
    assert!(matches!(
        locate_save_file(&dir),
        Err(CoreError::NotASave { .. })
    ));

    std::fs::write(dir.join("SaveGameInfo"), b"info").unwrap();
    let save = locate_save_file(&dir).unwrap();
    assert_eq!(save.file_name().and_then(|s| s.to_str()), Some("TestFarm_123456"));

    // Bad paths are a different failure family.
    assert!(matches!(
        locate_save_file(&dir.join("missing")),
        Err(CoreError::BadSaveDir { .. })
    ));
    assert!(matches!(
        locate_save_file(&dir.join("TestFarm_123456")),
        Err(CoreError::BadSaveDir { .. })
    ));
}

#[test]
fn persist_backs_up_then_writes() {
    let tmp = tempfile::tempdir().unwrap();
    let save_file = tmp.path().join("TestFarm_123456");
    std::fs::write(&save_file, SAVE_XML).unwrap();

    let mut doc = load_save(&save_file).unwrap();
    apply_swap(&mut doc, 0).unwrap();
    let backup =
        write_save_with_backup(&save_file, &doc, XmlWriteOpts { pretty: false }).unwrap();

    assert_eq!(backup, tmp.path().join("TestFarm_123456.orig"));
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), SAVE_XML);

    let swapped = load_save(&save_file).unwrap();
    let roster = read_roster(&swapped).unwrap();
    assert_eq!(roster.player_name, "Bob");
    assert_eq!(
        roster.farmhand_names,
        vec![None, Some("Alice".to_string())]
    );
}

#[test]
fn persist_refuses_to_clobber_backup() {
    let tmp = tempfile::tempdir().unwrap();
    let save_file = tmp.path().join("TestFarm_123456");
    std::fs::write(&save_file, SAVE_XML).unwrap();
    std::fs::write(tmp.path().join("TestFarm_123456.orig"), b"old backup").unwrap();

    let doc = load_save(&save_file).unwrap();
    assert!(matches!(
        write_save_with_backup(&save_file, &doc, XmlWriteOpts::default()),
        Err(CoreError::BackupExists(_))
    ));
    // Nothing moved or overwritten.
    assert_eq!(std::fs::read_to_string(&save_file).unwrap(), SAVE_XML);
    assert_eq!(
        std::fs::read(tmp.path().join("TestFarm_123456.orig")).unwrap(),
        b"old backup"
    );
}

#[test]
fn load_save_checks_root_tag() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("save");
    std::fs::write(&p, "<Farm><player /></Farm>").unwrap();
    match load_save(&p) {
        Err(CoreError::UnexpectedRoot(tag)) => assert_eq!(tag, "Farm"),
        other => panic!("expected UnexpectedRoot, got {other:?}"),
    }

    std::fs::write(&p, "<SaveGame><player></SaveGame>").unwrap();
    assert!(matches!(load_save(&p), Err(CoreError::Parse { .. })));
}
