use revtree_core::{
    compile_text, new_version_with, Error, Hunk, Patch, SequentialSource, Version, VersionManager,
};

#[test]
fn chain_of_edits_compiles_to_latest_text() {
    let texts = ["", "Hello", "Hello, world", "Hello, wiki world!", "Goodbye, wiki world!"];
    let mut source = SequentialSource::default();
    let mut manager = VersionManager::new();
    let mut parent = None;
    for pair in texts.windows(2) {
        let version = new_version_with(&mut source, pair[0], pair[1], parent.as_ref());
        parent = Some(version.id.clone());
        manager.add_version(version).unwrap();
    }

    assert_eq!(manager.compile_main_branch().unwrap(), "Goodbye, wiki world!");
    assert_eq!(compile_text(manager.main_branch().unwrap()).unwrap(), "Goodbye, wiki world!");
}

#[test]
fn each_fork_compiles_independently() {
    let mut source = SequentialSource::default();
    let root = new_version_with(&mut source, "", "The cat sat.", None);
    let left = new_version_with(&mut source, "The cat sat.", "The cat sat down.", Some(&root.id));
    let right = new_version_with(&mut source, "The cat sat.", "The dog sat.", Some(&root.id));
    let (root_id, left_id, right_id) = (root.id.clone(), left.id.clone(), right.id.clone());

    let manager = VersionManager::from_versions([right, root, left]).unwrap();

    assert_eq!(manager.compile_branch(&root_id).unwrap(), "The cat sat.");
    assert_eq!(manager.compile_branch(&left_id).unwrap(), "The cat sat down.");
    assert_eq!(manager.compile_branch(&right_id).unwrap(), "The dog sat.");
    // `left` is older, so it wins the tie.
    assert_eq!(manager.compile_main_branch().unwrap(), "The cat sat down.");
}

#[test]
fn empty_history_compiles_to_empty_text() {
    let manager = VersionManager::new();
    assert_eq!(manager.compile_main_branch().unwrap(), "");
    assert_eq!(compile_text(Vec::<Version>::new()).unwrap(), "");
}

#[test]
fn inapplicable_patch_aborts_compilation() {
    let mut source = SequentialSource::default();
    let root = new_version_with(&mut source, "", "alpha beta", None);
    let corrupt = Version::new(
        "corrupt",
        10,
        Patch::new(vec![Hunk {
            start: 0,
            before: "gamma".into(),
            after: "delta".into(),
        }]),
        Some(root.id.clone()),
    );

    let err = compile_text([&root, &corrupt]).unwrap_err();
    assert_eq!(err, Error::ApplyFailure { index: 1 });

    let manager = VersionManager::from_versions([root, corrupt]).unwrap();
    assert_eq!(
        manager.compile_main_branch().unwrap_err(),
        Error::ApplyFailure { index: 1 }
    );
}
