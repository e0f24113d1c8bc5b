use revtree_core::{
    make_patch, new_version_with, SequentialSource, VersionId, VersionSource,
};

#[test]
fn sequential_source_counts_up() {
    let mut source = SequentialSource::default();
    assert_eq!(source.next_id(), VersionId::from("v1"));
    assert_eq!(source.next_id(), VersionId::from("v2"));
    assert_eq!(source.now(), 1);
    assert_eq!(source.now(), 2);

    let mut resumed = SequentialSource::starting_at(7);
    assert_eq!(resumed.next_id(), VersionId::from("v8"));
    assert_eq!(resumed.now(), 8);
}

#[test]
fn new_version_links_parent_and_diffs_texts() {
    let mut source = SequentialSource::default();
    let root = new_version_with(&mut source, "", "draft", None);
    assert!(root.is_root());
    assert_eq!(root.patch, make_patch("", "draft"));

    let child = new_version_with(&mut source, "draft", "final draft", Some(&root.id));
    assert_eq!(child.parent.as_ref(), Some(&root.id));
    assert!(child.date > root.date);
    assert_eq!(child.patch.apply("draft").unwrap(), "final draft");
}

#[cfg(feature = "system")]
#[test]
fn system_versions_get_unique_ids_and_wall_clock_dates() {
    use revtree_core::new_version;

    let a = new_version("", "one", None);
    let b = new_version("one", "two", Some(&a.id));
    assert_ne!(a.id, b.id);
    assert!(a.date > 0);
    assert!(b.date >= a.date);
    assert_eq!(b.parent, Some(a.id));
}
