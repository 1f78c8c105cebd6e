// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Profile, role, funding source, and transfer behavior.

use crate::tests::helpers::{create_funding_source, create_profile, create_swimmer, test_db};
use crate::{NewProfile, PersistenceError};

#[test]
fn test_roles_default_to_empty() {
    let mut db = test_db();
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    assert!(db.get_roles_for_user(parent).unwrap().is_empty());

    let admin = create_profile(&mut db, "a@pool.test", "Alex Admin", &["admin"]);
    assert_eq!(db.get_roles_for_user(admin).unwrap(), vec!["admin"]);
}

#[test]
fn test_duplicate_email_rejected() {
    let mut db = test_db();
    create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);

    let duplicate = NewProfile {
        email: String::from("p@home.test"),
        full_name: String::from("Other Sam"),
        phone: None,
        created_at: String::from("2026-03-01T00:00:00Z"),
    };
    assert!(db.create_profile(&duplicate, &[]).is_err());
}

#[test]
fn test_delete_profile_blocked_by_linked_swimmers() {
    let mut db = test_db();
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    create_swimmer(&mut db, parent, None);

    let result = db.delete_profile(parent);
    assert!(matches!(
        result,
        Err(PersistenceError::ProfileHasSwimmers { swimmer_count: 1, .. })
    ));

    // An unlinked profile deletes cleanly.
    let other = create_profile(&mut db, "o@home.test", "Ona Ray", &["instructor"]);
    db.delete_profile(other).unwrap();
    assert!(db.get_profile(other).is_err());
}

#[test]
fn test_delete_funding_source_blocked_while_referenced() {
    let mut db = test_db();
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let source = create_funding_source(&mut db, "Valley Regional Center", "VMRC");
    let swimmer = create_swimmer(&mut db, parent, Some(source));

    assert!(matches!(
        db.delete_funding_source(source),
        Err(PersistenceError::FundingSourceInUse { swimmer_count: 1, .. })
    ));

    db.update_swimmer_funding(swimmer, None, "private_pay").unwrap();
    db.delete_funding_source(source).unwrap();
    assert!(db.get_funding_source(source).is_err());
}

#[test]
fn test_transfer_to_new_coordinator_is_atomic() {
    let mut db = test_db();
    let parent = create_profile(&mut db, "p@home.test", "Sam Ortiz", &[]);
    let swimmer = create_swimmer(&mut db, parent, None);

    let coordinator_profile = NewProfile {
        email: String::from("c@regional-center.net"),
        full_name: String::from("Casey Coord"),
        phone: None,
        created_at: String::from("2026-03-01T00:00:00Z"),
    };
    let coordinator = db
        .transfer_to_new_coordinator(swimmer, &coordinator_profile)
        .unwrap();

    assert_eq!(
        db.get_swimmer(swimmer).unwrap().coordinator_id,
        Some(coordinator)
    );
    assert_eq!(
        db.get_roles_for_user(coordinator).unwrap(),
        vec!["coordinator"]
    );
}

#[test]
fn test_transfer_to_missing_swimmer_rolls_back_profile() {
    let mut db = test_db();

    let coordinator_profile = NewProfile {
        email: String::from("c@regional-center.net"),
        full_name: String::from("Casey Coord"),
        phone: None,
        created_at: String::from("2026-03-01T00:00:00Z"),
    };
    assert!(db.transfer_to_new_coordinator(999, &coordinator_profile).is_err());

    // The coordinator profile insert must have rolled back with it.
    assert!(
        db.get_profile_by_email("c@regional-center.net")
            .unwrap()
            .is_none()
    );
}
