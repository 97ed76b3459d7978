use std::collections::BTreeMap;
use std::io;

use super::*;

use crate::fetch::BranchRefMode;
use crate::object::{Attribution, FileMode, Kind, Object, RevBlob, RevCommit, RevTree, TreeEntry};
use crate::repo::{MemoryRepo, ObjectStore, RefStore, RemoteRefLog};

fn sig() -> Attribution {
    Attribution::new("A U Thor", "author@example.com", 1_142_878_501, 150)
}

fn blob(content: &str) -> RevBlob {
    RevBlob::new(content.as_bytes().to_vec())
}

fn tree(name: &str, blob: &RevBlob) -> RevTree {
    RevTree::new(vec![TreeEntry::new(FileMode::Normal, name, *blob.id())])
}

fn commit(tree: &RevTree, parents: Vec<Id>, message: &str) -> RevCommit {
    RevCommit::new(*tree.id(), parents, sig(), sig(), message)
}

fn bogus_id() -> Id {
    Id::from_hex("0123456789abcdef0123456789abcdef01234567").unwrap()
}

// One commit over one tree over one blob, advertised as `origin-main`.
fn snapshot(content: &str) -> (RevCommit, RevTree, RevBlob, Payload) {
    let b = blob(content);
    let t = tree("a", &b);
    let c = commit(&t, vec![], "snapshot\n");

    let payload = Payload::new()
        .with_commit(c.clone())
        .with_tree(t.clone())
        .with_blob(b.clone())
        .with_branch(
            "origin-main",
            Ref::new("origin-main", *c.id(), RefKind::Commit),
        );

    (c, t, b, payload)
}

// Wraps a `MemoryRepo`; fails the nth `put_object` call (1-based).
#[derive(Default)]
struct FlakyRepo {
    inner: MemoryRepo,
    fail_on_put: Option<usize>,
    puts: usize,
}

impl ObjectStore for FlakyRepo {
    fn has_object(&self, id: &Id) -> Result<bool> {
        self.inner.has_object(id)
    }

    fn put_object(&mut self, object: &Object) -> Result<Id> {
        self.puts += 1;
        if Some(self.puts) == self.fail_on_put {
            return Err(Error::IoError(io::Error::new(
                io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.inner.put_object(object)
    }

    fn get_object(&self, id: &Id) -> Result<Option<Object>> {
        self.inner.get_object(id)
    }
}

impl RefStore for FlakyRepo {
    fn get_ref(&self, name: &str) -> Result<Option<Ref>> {
        self.inner.get_ref(name)
    }

    fn put_ref(&mut self, r: &Ref) -> Result<()> {
        self.inner.put_ref(r)
    }

    fn refs(&self) -> Result<Vec<Ref>> {
        self.inner.refs()
    }
}

impl RemoteRefLog for FlakyRepo {
    fn write_remote_ref(
        &mut self,
        local_branch: &str,
        remote_branch: &str,
        id: &Id,
    ) -> Result<()> {
        self.inner.write_remote_ref(local_branch, remote_branch, id)
    }

    fn remote_refs(&self, local_branch: &str) -> Result<BTreeMap<String, Id>> {
        self.inner.remote_refs(local_branch)
    }
}

#[test]
fn absent_payload() {
    let mut r = MemoryRepo::new();
    let mut events: Vec<FetchEvent> = Vec::new();

    let result = PayloadApplier::new(&mut r)
        .with_observer(&mut events)
        .apply("main", None)
        .unwrap();

    assert!(result.is_empty());
    assert!(events.is_empty());
    assert_eq!(r.object_puts(), 0);
    assert_eq!(r.ref_puts(), 0);
    assert_eq!(r.remote_ref_puts(), 0);
}

#[test]
fn empty_payload() {
    let mut r = MemoryRepo::new();
    let result = r.apply_payload("main", Some(&Payload::new())).unwrap();

    assert!(result.is_empty());
    assert_eq!(r.object_puts(), 0);
    assert_eq!(r.ref_puts(), 0);
}

#[test]
fn new_commit_moves_branch() {
    let mut r = MemoryRepo::new();
    let t = RevTree::new(vec![]);
    let c1 = commit(&t, vec![], "c1\n");

    let payload = Payload::new().with_commit(c1.clone());
    let result = r.apply_payload("main", Some(&payload)).unwrap();

    assert_eq!(result.commits(), 1);
    assert_eq!(result.trees(), 0);
    assert_eq!(result.blobs(), 0);
    assert_eq!(result.branches(), 0);

    assert!(r.has_object(c1.id()).unwrap());
    assert_eq!(
        r.get_ref("main").unwrap(),
        Some(Ref::new("main", *c1.id(), RefKind::Commit))
    );

    let stored = r.get_object(c1.id()).unwrap().unwrap();
    assert_eq!(stored.kind(), Kind::Commit);
    assert_eq!(RevCommit::from_object(&stored), Some(c1));
}

#[test]
fn last_inserted_commit_wins_branch() {
    let mut r = MemoryRepo::new();
    let t = RevTree::new(vec![]);
    let c1 = commit(&t, vec![], "c1\n");
    let c2 = commit(&t, vec![*c1.id()], "c2\n");

    let payload = Payload::new().with_commit(c1).with_commit(c2.clone());
    let result = r.apply_payload("main", Some(&payload)).unwrap();

    assert_eq!(result.commits(), 2);
    assert_eq!(r.get_ref("main").unwrap().unwrap().id(), c2.id());
    assert_eq!(r.ref_puts(), 2);
}

#[test]
fn new_remote_branch() {
    let mut r = MemoryRepo::new();
    let x = bogus_id();

    let payload = Payload::new().with_branch(
        "origin-main",
        Ref::new("origin-main", x, RefKind::Commit),
    );
    let result = r.apply_payload("main", Some(&payload)).unwrap();

    assert_eq!(result.branches(), 1);
    assert_eq!(
        r.get_ref("refs/remotes/main/master").unwrap(),
        Some(Ref::new("refs/remotes/main/master", x, RefKind::Remote))
    );

    let log = r.remote_refs("main").unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log["origin-main"], x);
    assert_eq!(r.ref_puts(), 1);
    assert_eq!(r.remote_ref_puts(), 1);
}

#[test]
fn idempotent() {
    let mut r = MemoryRepo::new();
    let (c, t, b, payload) = snapshot("hello\n");

    let first = r.apply_payload("main", Some(&payload)).unwrap();
    assert_eq!(first.to_string(), "1 commits, 1 trees, 1 blobs, 1 branches");

    let objects = r.object_puts();
    let refs = r.refs().unwrap();
    let ref_puts = r.ref_puts();
    let log = r.remote_refs("main").unwrap();

    let mut events: Vec<FetchEvent> = Vec::new();
    let second = PayloadApplier::new(&mut r)
        .with_observer(&mut events)
        .apply("main", Some(&payload))
        .unwrap();

    assert_eq!(second.commits(), 0);
    assert_eq!(second.trees(), 0);
    assert_eq!(second.blobs(), 0);
    assert_eq!(second.branches(), first.branches());

    assert_eq!(r.object_puts(), objects);
    assert_eq!(r.ref_puts(), ref_puts);
    assert_eq!(r.remote_ref_puts(), 1);
    assert_eq!(r.refs().unwrap(), refs);
    assert_eq!(r.remote_refs("main").unwrap(), log);

    assert_eq!(
        events,
        vec![
            FetchEvent::CommitSkipped { id: *c.id() },
            FetchEvent::TreeSkipped { id: *t.id() },
            FetchEvent::BlobSkipped { id: *b.id() },
            FetchEvent::RemoteRefUnchanged {
                remote_branch: "origin-main".to_string(),
                ref_name: "refs/remotes/main/master".to_string(),
                id: *c.id(),
            },
        ]
    );
}

#[test]
fn partial_duplicates() {
    let mut r = MemoryRepo::new();
    let have = blob("already here\n");
    let want = blob("new\n");
    r.put_object(&have.to_object()).unwrap();

    let payload = Payload::new().with_blob(have).with_blob(want.clone());
    let result = r.apply_payload("main", Some(&payload)).unwrap();

    assert_eq!(result.blobs(), 1);
    assert_eq!(r.object_count(), 2);
    assert!(r.has_object(want.id()).unwrap());
    // One put from the setup above, one from the payload.
    assert_eq!(r.object_puts(), 2);
}

#[test]
fn remote_ref_unchanged() {
    let mut r = MemoryRepo::new();
    let x = bogus_id();
    r.update_ref(&Ref::new("refs/remotes/main/master", x, RefKind::Remote))
        .unwrap();

    let payload = Payload::new().with_branch(
        "origin-main",
        Ref::new("origin-main", x, RefKind::Commit),
    );
    let result = r.apply_payload("main", Some(&payload)).unwrap();

    assert_eq!(result.branches(), 1);
    assert_eq!(r.ref_puts(), 1);
    assert_eq!(r.remote_ref_puts(), 0);
    assert!(r.remote_refs("main").unwrap().is_empty());
}

#[test]
fn remote_ref_moved() {
    let mut r = MemoryRepo::new();
    let (c, _, _, _) = snapshot("v1\n");
    let old = *c.id();
    r.update_ref(&Ref::new("refs/remotes/main/master", old, RefKind::Remote))
        .unwrap();

    let new = bogus_id();
    let payload = Payload::new().with_branch(
        "origin-main",
        Ref::new("origin-main", new, RefKind::Commit),
    );

    let mut events: Vec<FetchEvent> = Vec::new();
    let result = PayloadApplier::new(&mut r)
        .with_observer(&mut events)
        .apply("main", Some(&payload))
        .unwrap();

    assert_eq!(result.branches(), 1);
    assert_eq!(r.ref_puts(), 2);
    assert_eq!(r.remote_ref_puts(), 1);
    assert_eq!(r.remote_refs("main").unwrap()["origin-main"], new);
    assert_eq!(
        r.get_ref("refs/remotes/main/master").unwrap().unwrap().id(),
        &new
    );

    assert_eq!(
        events,
        vec![FetchEvent::RemoteRefUpdated {
            remote_branch: "origin-main".to_string(),
            ref_name: "refs/remotes/main/master".to_string(),
            old: Some(old),
            new,
        }]
    );
}

#[test]
fn remote_ref_with_wrong_kind_is_rewritten() {
    let mut r = MemoryRepo::new();
    let x = bogus_id();
    r.put_ref(&Ref::new("refs/remotes/main/master", x, RefKind::Commit))
        .unwrap();

    let payload = Payload::new().with_branch(
        "origin-main",
        Ref::new("origin-main", x, RefKind::Commit),
    );
    r.apply_payload("main", Some(&payload)).unwrap();

    assert_eq!(
        r.get_ref("refs/remotes/main/master").unwrap().unwrap().kind(),
        RefKind::Remote
    );
    assert_eq!(r.remote_ref_puts(), 1);
}

#[test]
fn several_remote_branches_share_tracking_ref() {
    let mut r = MemoryRepo::new();
    let (a, _, _, _) = snapshot("a\n");
    let (b, _, _, _) = snapshot("b\n");

    // Inserted out of order; reconciled in name order.
    let payload = Payload::new()
        .with_branch("origin-b", Ref::new("origin-b", *b.id(), RefKind::Commit))
        .with_branch("origin-a", Ref::new("origin-a", *a.id(), RefKind::Commit));

    let mut events: Vec<FetchEvent> = Vec::new();
    let result = PayloadApplier::new(&mut r)
        .with_observer(&mut events)
        .apply("main", Some(&payload))
        .unwrap();

    assert_eq!(result.branches(), 2);
    assert_eq!(
        r.get_ref("refs/remotes/main/master").unwrap().unwrap().id(),
        b.id()
    );

    let log = r.remote_refs("main").unwrap();
    assert_eq!(log["origin-a"], *a.id());
    assert_eq!(log["origin-b"], *b.id());

    let remotes: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            FetchEvent::RemoteRefUpdated { remote_branch, .. } => Some(remote_branch.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(remotes, vec!["origin-a", "origin-b"]);
}

#[test]
fn commits_only_by_default() {
    let mut r = MemoryRepo::new();
    let b = blob("x\n");
    let t = tree("x", &b);

    let payload = Payload::new().with_tree(t).with_blob(b);
    let result = r.apply_payload("main", Some(&payload)).unwrap();

    assert_eq!(result.trees(), 1);
    assert_eq!(result.blobs(), 1);
    assert!(r.refs().unwrap().is_empty());
}

#[test]
fn per_kind_refs() {
    let mut r = MemoryRepo::new();
    let (c, t, b, payload) = snapshot("x\n");

    PayloadApplier::new(&mut r)
        .with_options(ApplyOptions::new().with_branch_refs(BranchRefMode::PerKind))
        .apply("main", Some(&payload))
        .unwrap();

    assert_eq!(
        r.get_ref("main").unwrap(),
        Some(Ref::new("main", *c.id(), RefKind::Commit))
    );
    assert_eq!(
        r.get_ref("refs/trees/main").unwrap(),
        Some(Ref::new("refs/trees/main", *t.id(), RefKind::Tree))
    );
    assert_eq!(
        r.get_ref("refs/blobs/main").unwrap(),
        Some(Ref::new("refs/blobs/main", *b.id(), RefKind::Blob))
    );
}

#[test]
fn shared_refs() {
    let mut r = MemoryRepo::new();
    let (_, _, b, payload) = snapshot("x\n");

    PayloadApplier::new(&mut r)
        .with_options(ApplyOptions::new().with_branch_refs(BranchRefMode::Shared))
        .apply("main", Some(&payload))
        .unwrap();

    // The blob was inserted last, so it owns the branch name.
    assert_eq!(
        r.get_ref("main").unwrap(),
        Some(Ref::new("main", *b.id(), RefKind::Blob))
    );
}

#[test]
fn declared_id_drives_dedup() {
    let mut r = MemoryRepo::new();
    let real = blob("content\n");
    let lying = real.clone().with_declared_id(bogus_id());

    // Present under its real ID, but the peer's declared ID is unknown.
    r.put_object(&real.to_object()).unwrap();
    let result = r
        .apply_payload("main", Some(&Payload::new().with_blob(lying)))
        .unwrap();
    assert_eq!(result.blobs(), 1);
    assert_eq!(r.object_count(), 1);

    // Declared ID present: skipped even though the content differs.
    let mut r = MemoryRepo::new();
    let other = blob("other\n");
    r.put_object(&other.to_object()).unwrap();
    let impostor = blob("content\n").with_declared_id(*other.id());
    let result = r
        .apply_payload("main", Some(&Payload::new().with_blob(impostor)))
        .unwrap();
    assert_eq!(result.blobs(), 0);
    assert!(!r.has_object(real.id()).unwrap());
}

#[test]
fn branch_points_at_stored_id() {
    let mut r = MemoryRepo::new();
    let t = RevTree::new(vec![]);
    let c = commit(&t, vec![], "c\n");
    let lying = c.clone().with_declared_id(bogus_id());

    r.apply_payload("main", Some(&Payload::new().with_commit(lying)))
        .unwrap();

    assert_eq!(r.get_ref("main").unwrap().unwrap().id(), c.id());
    assert!(!r.has_object(&bogus_id()).unwrap());
}

#[test]
fn commit_with_extra_header_keeps_its_id() {
    let o = Object::new(
        Kind::Commit,
        b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
          author A U Thor <author@example.com> 1142878501 +0230\n\
          committer A U Thor <author@example.com> 1142878501 +0230\n\
          encoding ISO-8859-1\n\
          \n\
          latin-1 message\n"
            .to_vec(),
    );
    let c = RevCommit::from_object(&o).unwrap();
    let payload = Payload::new().with_commit(c);

    let mut r = MemoryRepo::new();
    let first = r.apply_payload("main", Some(&payload)).unwrap();
    assert_eq!(first.commits(), 1);
    assert!(r.has_object(o.id()).unwrap());
    assert_eq!(r.get_ref("main").unwrap().unwrap().id(), o.id());

    let second = r.apply_payload("main", Some(&payload)).unwrap();
    assert_eq!(second.commits(), 0);
    assert_eq!(r.object_count(), 1);
}

#[test]
fn verify_ids_rejects_mismatch() {
    let mut r = MemoryRepo::new();
    let c = commit(&RevTree::new(vec![]), vec![], "c\n");
    let lying = c.clone().with_declared_id(bogus_id());

    let err = PayloadApplier::new(&mut r)
        .with_options(ApplyOptions::new().with_verify_ids(true))
        .apply("main", Some(&Payload::new().with_commit(lying)))
        .unwrap_err();

    if let Error::IdMismatch {
        kind,
        declared,
        computed,
    } = err
    {
        assert_eq!(kind, Kind::Commit);
        assert_eq!(declared, bogus_id());
        assert_eq!(computed, *c.id());
    } else {
        panic!("wrong error: {:?}", err);
    }

    assert_eq!(r.object_puts(), 0);
    assert_eq!(r.ref_puts(), 0);
}

#[test]
fn verify_ids_accepts_honest_payload() {
    let mut r = MemoryRepo::new();
    let (_, _, _, payload) = snapshot("honest\n");

    let result = PayloadApplier::new(&mut r)
        .with_options(ApplyOptions::new().with_verify_ids(true))
        .apply("main", Some(&payload))
        .unwrap();

    assert_eq!(result.to_string(), "1 commits, 1 trees, 1 blobs, 1 branches");
}

#[test]
fn check_objects() {
    let b = blob("x\n");
    let bad = tree(".git", &b);
    let payload = Payload::new().with_tree(bad.clone());

    let mut r = MemoryRepo::new();
    let err = PayloadApplier::new(&mut r)
        .with_options(ApplyOptions::new().with_check_objects(true))
        .apply("main", Some(&payload))
        .unwrap_err();

    if let Error::CorruptObject { kind, id } = err {
        assert_eq!(kind, Kind::Tree);
        assert_eq!(id, *bad.id());
    } else {
        panic!("wrong error: {:?}", err);
    }
    assert_eq!(r.object_count(), 0);

    // Unchecked, the same tree is stored as is.
    let mut r = MemoryRepo::new();
    let result = r.apply_payload("main", Some(&payload)).unwrap();
    assert_eq!(result.trees(), 1);
}

#[test]
fn event_order() {
    let mut r = MemoryRepo::new();
    let (c, t, b, payload) = snapshot("events\n");

    let mut events: Vec<FetchEvent> = Vec::new();
    PayloadApplier::new(&mut r)
        .with_observer(&mut events)
        .apply("main", Some(&payload))
        .unwrap();

    assert_eq!(
        events,
        vec![
            FetchEvent::CommitAdded {
                id: *c.id(),
                branch: "main".to_string()
            },
            FetchEvent::TreeAdded { id: *t.id() },
            FetchEvent::BlobAdded { id: *b.id() },
            FetchEvent::RemoteRefUpdated {
                remote_branch: "origin-main".to_string(),
                ref_name: "refs/remotes/main/master".to_string(),
                old: None,
                new: *c.id(),
            },
        ]
    );
}

#[test]
fn closure_observer() {
    let mut r = MemoryRepo::new();
    let (_, _, _, payload) = snapshot("closure\n");

    let mut added = 0;
    let mut count = |e: &FetchEvent| {
        if let FetchEvent::BlobAdded { .. } | FetchEvent::TreeAdded { .. } = e {
            added += 1;
        }
    };

    PayloadApplier::new(&mut r)
        .with_observer(&mut count)
        .apply("main", Some(&payload))
        .unwrap();

    assert_eq!(added, 2);
}

#[test]
fn failure_keeps_earlier_writes_and_retry_completes() {
    let (c, t, b, payload) = snapshot("retry\n");

    let mut r = FlakyRepo {
        fail_on_put: Some(2),
        ..FlakyRepo::default()
    };

    let mut events: Vec<FetchEvent> = Vec::new();
    let err = PayloadApplier::new(&mut r)
        .with_observer(&mut events)
        .apply("main", Some(&payload))
        .unwrap_err();
    assert!(matches!(err, Error::IoError(_)));

    // The commit made it; the tree did not, and nothing after it ran.
    assert!(r.has_object(c.id()).unwrap());
    assert!(!r.has_object(t.id()).unwrap());
    assert!(!r.has_object(b.id()).unwrap());
    assert_eq!(r.get_ref("main").unwrap().unwrap().id(), c.id());
    assert_eq!(r.get_ref("refs/remotes/main/master").unwrap(), None);
    assert_eq!(
        events,
        vec![FetchEvent::CommitAdded {
            id: *c.id(),
            branch: "main".to_string()
        }]
    );

    r.fail_on_put = None;
    let result = r.apply_payload("main", Some(&payload)).unwrap();
    assert_eq!(result.to_string(), "0 commits, 1 trees, 1 blobs, 1 branches");

    let mut clean = MemoryRepo::new();
    clean.apply_payload("main", Some(&payload)).unwrap();
    assert_eq!(r.refs().unwrap(), clean.refs().unwrap());
    assert_eq!(
        r.remote_refs("main").unwrap(),
        clean.remote_refs("main").unwrap()
    );
    assert_eq!(r.inner.object_count(), clean.object_count());
}

#[test]
fn invalid_branch_name_propagates() {
    let mut r = MemoryRepo::new();
    let (c, _, _, payload) = snapshot("bad branch\n");

    let err = r.apply_payload("bad branch", Some(&payload)).unwrap_err();
    if let Error::InvalidRefName(name) = err {
        assert_eq!(name, "bad branch");
    } else {
        panic!("wrong error: {:?}", err);
    }

    // The commit was stored before its ref write failed.
    assert!(r.has_object(c.id()).unwrap());
    assert!(r.refs().unwrap().is_empty());
}
