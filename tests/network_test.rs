use genealogy::downloader::to_json;
use genealogy::{
    CollectingObserver, ExpansionState, HierarchyRenderer, Mode, NetworkView, PersonRecord,
    TextTreeRenderer, build, build_observed, inspect,
};
use std::collections::HashSet;

fn chain() -> Vec<PersonRecord> {
    vec![
        PersonRecord::create("a", "Ana").founder(),
        PersonRecord::create("b", "Bia").evangelized_by("a"),
        PersonRecord::create("c", "Caio").evangelized_by("b"),
    ]
}

fn level_of(view: &NetworkView, id: &str) -> usize {
    view.node(id).map(|node| node.level).unwrap_or(usize::MAX)
}

fn descendants_of(view: &NetworkView, id: &str) -> usize {
    view.node(id)
        .map(|node| node.total_descendants)
        .unwrap_or(usize::MAX)
}

#[test]
fn empty_input_builds_empty_view() {
    for mode in Mode::ALL {
        let view = build(&[], mode);
        assert!(view.connected.is_empty());
        assert!(view.standby.is_empty());
        assert!(view.roots.is_empty());
        assert_eq!(view.mode, mode);
    }
    println!("✓ empty input yields an empty view in every mode");
}

#[test]
fn founder_is_always_a_root() {
    let records = vec![
        PersonRecord::create("a", "Ana").evangelized_by("b"),
        PersonRecord::create("b", "Bia").founder().evangelized_by("a"),
        PersonRecord::create("z", "Zeca").founder().evangelized_by("ghost"),
    ];
    let view = build(&records, Mode::Evangelism);

    assert_eq!(level_of(&view, "b"), 0);
    assert_eq!(level_of(&view, "z"), 0);
    assert!(view.root_ids().contains(&"b"));
    assert!(view.root_ids().contains(&"z"));
    assert!(!view.root_ids().contains(&"a"));
    println!("✓ founders sit at level 0 and head a tree whatever their parent says");
}

#[test]
fn simple_chain_levels_and_descendants() {
    let view = build(&chain(), Mode::Evangelism);

    assert_eq!(level_of(&view, "a"), 0);
    assert_eq!(level_of(&view, "b"), 1);
    assert_eq!(level_of(&view, "c"), 2);
    assert_eq!(descendants_of(&view, "a"), 2);
    assert_eq!(descendants_of(&view, "b"), 1);
    assert_eq!(descendants_of(&view, "c"), 0);

    assert_eq!(view.root_ids(), vec!["a"]);
    assert_eq!(view.roots[0].size(), 3);
    assert_eq!(view.node("b").unwrap().child_ids, vec!["c"]);
    println!("✓ A -> B -> C gives levels 0/1/2 and descendants 2/1/0");
}

#[test]
fn two_node_cycle_terminates_deterministically() {
    let records = vec![
        PersonRecord::create("a", "Ana").evangelized_by("b"),
        PersonRecord::create("b", "Bia").evangelized_by("a"),
    ];
    let first = build(&records, Mode::Evangelism);
    let second = build(&records, Mode::Evangelism);

    assert_eq!(first, second);
    assert_eq!(level_of(&first, "a"), 1);
    assert_eq!(level_of(&first, "b"), 1);
    assert_eq!(first.connected.len(), 2);
    assert!(first.roots.is_empty());

    let report = inspect(&records, Mode::Evangelism);
    assert_eq!(report.cycles, vec![vec!["a".to_string(), "b".to_string()]]);
    println!("✓ A <-> B terminates with finite levels and is reported as a cycle");
}

#[test]
fn founderless_cycle_with_branch_stays_out_of_roots() {
    let records = vec![
        PersonRecord::create("f", "Founder").founder(),
        PersonRecord::create("x", "Xavier").evangelized_by("z"),
        PersonRecord::create("y", "Yara").evangelized_by("x"),
        PersonRecord::create("z", "Zeca").evangelized_by("y"),
        PersonRecord::create("k", "Kim").evangelized_by("x"),
    ];
    let mut observer = CollectingObserver::default();
    let view = build_observed(&records, Mode::Evangelism, &mut observer);

    assert_eq!(view.len(), records.len());
    assert!(view.nodes().all(|node| node.level < records.len()));
    assert!(!observer.edges.is_empty());
    assert_eq!(view.root_ids(), vec!["f"]);
    assert!(view.standby.is_empty());
    assert_eq!(level_of(&view, "x"), 2);
    assert_eq!(level_of(&view, "k"), 3);
    println!("✓ a three-node cycle with a branch terminates");
}

#[test]
fn isolated_record_is_standby() {
    let records = vec![
        PersonRecord::create("a", "Ana").founder(),
        PersonRecord::create("e", "Eva"),
    ];
    let view = build(&records, Mode::Evangelism);

    assert!(view.is_standby("e"));
    assert!(view.connected.iter().all(|node| node.id() != "e"));
    assert_eq!(view.root_ids(), vec!["a"]);
    println!("✓ isolated non-founder goes to standby");
}

#[test]
fn partition_covers_every_record_once() {
    let records = vec![
        PersonRecord::create("a", "Ana").founder(),
        PersonRecord::create("b", "Bia").evangelized_by("a").led_by("c"),
        PersonRecord::create("c", "Caio").led_by("b"),
        PersonRecord::create("d", "Davi").evangelized_by("ghost"),
        PersonRecord::create("e", "Eva"),
        PersonRecord::create("f", "Fabi").evangelized_by("d"),
    ];
    for mode in Mode::ALL {
        let view = build(&records, mode);
        assert_eq!(view.connected.len() + view.standby.len(), records.len());

        let connected: HashSet<&str> = view.connected.iter().map(|n| n.id()).collect();
        let standby: HashSet<&str> = view.standby.iter().map(|n| n.id()).collect();
        assert!(connected.is_disjoint(&standby));
    }
    println!("✓ connected and standby partition the input in both modes");
}

#[test]
fn dangling_parent_behaves_like_no_parent() {
    let dangling = vec![
        PersonRecord::create("d", "Davi").evangelized_by("ghost"),
        PersonRecord::create("f", "Fabi").evangelized_by("d"),
    ];
    let orphan = vec![
        PersonRecord::create("d", "Davi"),
        PersonRecord::create("f", "Fabi").evangelized_by("d"),
    ];
    let with_dangling = build(&dangling, Mode::Evangelism);
    let without = build(&orphan, Mode::Evangelism);

    assert_eq!(level_of(&with_dangling, "d"), level_of(&without, "d"));
    assert_eq!(level_of(&with_dangling, "f"), level_of(&without, "f"));
    assert_eq!(with_dangling.root_ids(), without.root_ids());
    assert_eq!(
        with_dangling.node("d").unwrap().person.parent_id_evangelism.as_deref(),
        Some("ghost")
    );

    let lonely = build(
        &[PersonRecord::create("g", "Gil").evangelized_by("ghost")],
        Mode::Evangelism,
    );
    assert!(lonely.is_standby("g"));
    println!("✓ unresolved parents count as absent but are kept in the output");
}

#[test]
fn modes_do_not_interfere() {
    let records = vec![
        PersonRecord::create("a", "Ana").founder(),
        PersonRecord::create("b", "Bia").evangelized_by("a"),
        PersonRecord::create("c", "Caio").evangelized_by("b").led_by("a"),
        PersonRecord::create("d", "Davi").led_by("c"),
    ];

    let evangelism_alone = build(&records, Mode::Evangelism);
    let discipleship = build(&records, Mode::Discipleship);
    let evangelism_again = build(&records, Mode::Evangelism);

    assert_eq!(evangelism_alone, evangelism_again);
    assert_eq!(level_of(&evangelism_alone, "c"), 2);
    assert_eq!(level_of(&discipleship, "c"), 1);
    assert_eq!(level_of(&discipleship, "d"), 2);
    assert!(evangelism_alone.is_standby("d"));
    assert!(discipleship.is_standby("b"));
    assert_eq!(descendants_of(&discipleship, "a"), 2);
    assert_eq!(descendants_of(&evangelism_alone, "a"), 2);
    println!("✓ evangelism and discipleship builds are independent");
}

#[test]
fn duplicate_ids_resolve_to_first_record() {
    let records = vec![
        PersonRecord::create("a", "Ana").founder(),
        PersonRecord::create("b", "Bia").evangelized_by("a"),
        PersonRecord::create("b", "Bia (copy)"),
        PersonRecord::create("c", "Caio").evangelized_by("b"),
    ];
    let view = build(&records, Mode::Evangelism);

    assert_eq!(view.len(), 4);
    assert_eq!(level_of(&view, "c"), 2);
    assert_eq!(inspect(&records, Mode::Evangelism).duplicate_ids, vec!["b"]);

    // The copy owns no children, so it is isolated rather than a second root.
    assert_eq!(view.root_ids(), vec!["a"]);
    assert_eq!(view.standby.len(), 1);
    assert_eq!(view.standby[0].name(), "Bia (copy)");
    assert!(view.standby[0].child_ids.is_empty());

    let tree = &view.roots[0];
    let names: Vec<&str> = tree.nodes.iter().map(|entry| entry.node.name()).collect();
    assert_eq!(names, vec!["Ana", "Bia", "Caio"]);
    assert_eq!(tree.height(), 2);
    println!("✓ duplicate ids are all classified and lookups use the first");
}

#[test]
fn deep_chain_builds_exports_and_drops() {
    let depth = 5_000;
    let mut records = vec![PersonRecord::create("0", "root").founder()];
    for i in 1..depth {
        records.push(PersonRecord::create(i.to_string(), "n").evangelized_by((i - 1).to_string()));
    }

    let view = build(&records, Mode::Evangelism);
    assert_eq!(view.root_ids(), vec!["0"]);
    assert_eq!(view.roots[0].size(), depth);
    assert_eq!(view.roots[0].height(), depth - 1);
    assert_eq!(level_of(&view, "4999"), depth - 1);

    let copy = view.clone();
    assert_eq!(copy, view);
    drop(copy);

    let json = to_json(&view, None).expect("Failed to export deep chain");
    assert!(json.contains("\"totalDescendants\": 4999"));

    let collapsed = TextTreeRenderer::default().render(&view, &ExpansionState::new());
    assert!(collapsed.contains("+ root [level 0, 4999 descendants]"));

    drop(view);
    println!("✓ a {}-generation chain builds, compares, exports and drops", depth);
}
