// Workflow tests for Mangalya against the in-memory store

use chrono::NaiveDate;
use mangalya::core::photos::{upload_photos, PhotoLimits, PhotoUpload};
use mangalya::core::{accounts, credits, matching, profiles};
use mangalya::models::{CandidateFilters, ProfileChanges, RegisterRequest, TransactionKind};
use mangalya::{ApiError, LocalMediaStorage, MemoryStore, Store};
use std::sync::Arc;
use uuid::Uuid;

const SIGNUP_GRANT: i32 = 20;

async fn register(store: &MemoryStore, username: &str) -> Uuid {
    let account = accounts::register(
        store,
        RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "correct-horse".to_string(),
            password2: "correct-horse".to_string(),
            phone_number: None,
        },
        SIGNUP_GRANT,
    )
    .await
    .unwrap();
    account.id
}

async fn set_biodata(store: &MemoryStore, user_id: Uuid, gender: &str, dob: (i32, u32, u32)) -> i64 {
    let changes = ProfileChanges {
        full_name: Some(format!("{} {}", gender, dob.0)),
        gender: Some(gender.to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(dob.0, dob.1, dob.2),
        ..Default::default()
    };
    profiles::update_own_profile(store, user_id, changes)
        .await
        .unwrap()
        .profile
        .id
}

fn temp_media() -> LocalMediaStorage {
    let root = std::env::temp_dir().join(format!("mangalya-test-{}", Uuid::new_v4()));
    LocalMediaStorage::new(root, "/media")
}

fn jpeg(name: &str) -> PhotoUpload {
    PhotoUpload {
        file_name: Some(name.to_string()),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

#[tokio::test]
async fn test_signup_grant_and_single_unlock() {
    let store = MemoryStore::new();
    let viewer = register(&store, "ravi").await;
    let owner = register(&store, "lakshmi").await;
    let target = set_biodata(&store, owner, "Female", (1995, 4, 2)).await;

    let balance = store.find_account(viewer).await.unwrap().unwrap().credits;
    assert_eq!(balance, 20);

    let remaining = credits::unlock(&store, viewer, target).await.unwrap();
    assert_eq!(remaining, 19);

    let unlocks = store
        .list_transactions(viewer, Some(TransactionKind::Unlock))
        .await
        .unwrap();
    assert_eq!(unlocks.len(), 1);
    assert_eq!(unlocks[0].profile_id, Some(target));
    assert_eq!(unlocks[0].credits, 1);
}

#[tokio::test]
async fn test_second_unlock_is_rejected_without_charge() {
    let store = MemoryStore::new();
    let viewer = register(&store, "ravi").await;
    let owner = register(&store, "lakshmi").await;
    let target = set_biodata(&store, owner, "Female", (1995, 4, 2)).await;

    credits::unlock(&store, viewer, target).await.unwrap();
    let err = credits::unlock(&store, viewer, target).await.unwrap_err();
    assert!(matches!(err, ApiError::AlreadyUnlocked));

    let balance = store.find_account(viewer).await.unwrap().unwrap().credits;
    assert_eq!(balance, 19);
    assert_eq!(store.list_transactions(viewer, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unlock_missing_profile_is_not_found() {
    let store = MemoryStore::new();
    let viewer = register(&store, "ravi").await;

    let err = credits::unlock(&store, viewer, 4242).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(store.find_account(viewer).await.unwrap().unwrap().credits, 20);
}

#[tokio::test]
async fn test_balance_never_goes_negative() {
    let store = MemoryStore::new();
    let viewer = register(&store, "ravi").await;

    let mut targets = Vec::new();
    for _ in 0..(SIGNUP_GRANT + 1) {
        targets.push(store.get_or_create_profile(Uuid::new_v4()).await.unwrap().id);
    }

    for target in &targets[..SIGNUP_GRANT as usize] {
        credits::unlock(&store, viewer, *target).await.unwrap();
    }

    let err = credits::unlock(&store, viewer, targets[SIGNUP_GRANT as usize])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InsufficientCredits { required: 1 }));
    assert_eq!(store.find_account(viewer).await.unwrap().unwrap().credits, 0);
}

#[tokio::test]
async fn test_male_requester_sees_only_younger_women() {
    let store = MemoryStore::new();
    let requester = register(&store, "arjun").await;
    set_biodata(&store, requester, "Male", (1990, 1, 1)).await;

    let f1 = register(&store, "f1").await;
    let younger_woman = set_biodata(&store, f1, "Female", (1992, 1, 1)).await;
    let f2 = register(&store, "f2").await;
    set_biodata(&store, f2, "Female", (1988, 1, 1)).await;
    let m1 = register(&store, "m1").await;
    set_biodata(&store, m1, "Male", (1993, 1, 1)).await;

    let candidates = matching::list_candidates(&store, requester, CandidateFilters::default())
        .await
        .unwrap();
    let ids: Vec<i64> = candidates.iter().map(|c| c.profile.id).collect();
    assert_eq!(ids, vec![younger_woman]);
}

#[tokio::test]
async fn test_female_requester_sees_only_older_men() {
    let store = MemoryStore::new();
    let requester = register(&store, "priya").await;
    set_biodata(&store, requester, "Female", (1996, 7, 15)).await;

    let m1 = register(&store, "m1").await;
    let older_man = set_biodata(&store, m1, "male", (1991, 3, 3)).await;
    let m2 = register(&store, "m2").await;
    set_biodata(&store, m2, "Male", (1998, 3, 3)).await;

    let candidates = matching::list_candidates(&store, requester, CandidateFilters::default())
        .await
        .unwrap();
    let ids: Vec<i64> = candidates.iter().map(|c| c.profile.id).collect();
    assert_eq!(ids, vec![older_man]);
}

#[tokio::test]
async fn test_requester_without_gender_gets_empty_list() {
    let store = MemoryStore::new();
    let requester = register(&store, "anon").await;

    let f1 = register(&store, "f1").await;
    set_biodata(&store, f1, "Female", (1992, 1, 1)).await;

    let candidates = matching::list_candidates(&store, requester, CandidateFilters::default())
        .await
        .unwrap();
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn test_candidate_filters_narrow_the_list() {
    let store = MemoryStore::new();
    let requester = register(&store, "arjun").await;
    set_biodata(&store, requester, "Male", (1990, 1, 1)).await;

    let f1 = register(&store, "f1").await;
    let tamil = set_biodata(&store, f1, "Female", (1992, 1, 1)).await;
    profiles::update_own_profile(
        &store,
        f1,
        ProfileChanges {
            mother_tongue: Some("Tamil".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let f2 = register(&store, "f2").await;
    set_biodata(&store, f2, "Female", (1993, 1, 1)).await;

    let filters = CandidateFilters {
        mother_tongue: Some("tamil".to_string()),
        ..Default::default()
    };
    let candidates = matching::list_candidates(&store, requester, filters).await.unwrap();
    let ids: Vec<i64> = candidates.iter().map(|c| c.profile.id).collect();
    assert_eq!(ids, vec![tamil]);
}

#[tokio::test]
async fn test_photo_limit_rejects_whole_batch() {
    let store = MemoryStore::new();
    let media = temp_media();
    let owner = register(&store, "lakshmi").await;
    let limits = PhotoLimits::default();

    let four: Vec<PhotoUpload> = (0..4).map(|i| jpeg(&format!("{}.jpg", i))).collect();
    let err = upload_photos(&store, &media, owner, four, &limits).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let profile = store.find_profile_by_user(owner).await.unwrap().unwrap();
    assert_eq!(store.count_photos(profile.id).await.unwrap(), 0);

    let three: Vec<PhotoUpload> = (0..3).map(|i| jpeg(&format!("{}.jpg", i))).collect();
    let stored = upload_photos(&store, &media, owner, three, &limits).await.unwrap();
    assert_eq!(stored.len(), 3);

    let err = upload_photos(&store, &media, owner, vec![jpeg("extra.png")], &limits)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(store.count_photos(profile.id).await.unwrap(), 3);

    let _ = tokio::fs::remove_dir_all(media.root()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_uploads_respect_photo_limit() {
    let store = Arc::new(MemoryStore::new());
    let media = Arc::new(temp_media());
    let owner = register(&store, "lakshmi").await;
    let profile_id = store.get_or_create_profile(owner).await.unwrap().id;

    let handles: Vec<_> = (0..2)
        .map(|batch| {
            let store = Arc::clone(&store);
            let media = Arc::clone(&media);
            tokio::spawn(async move {
                let uploads: Vec<PhotoUpload> = (0..3).map(|i| jpeg(&format!("{}-{}.jpg", batch, i))).collect();
                upload_photos(store.as_ref(), &media, owner, uploads, &PhotoLimits::default()).await
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(photos) => {
                assert_eq!(photos.len(), 3);
                succeeded += 1;
            }
            Err(err) => assert!(matches!(err, ApiError::Validation(_))),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(store.count_photos(profile_id).await.unwrap(), 3);

    // Files written by the rejected batch are removed
    let dir = media.root().join("profile_photos").join(profile_id.to_string());
    let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
    let mut files = 0;
    while entries.next_entry().await.unwrap().is_some() {
        files += 1;
    }
    assert_eq!(files, 3);

    let _ = tokio::fs::remove_dir_all(media.root()).await;
}

#[tokio::test]
async fn test_detail_is_gated_by_unlock() {
    let store = MemoryStore::new();
    let media = temp_media();
    let viewer = register(&store, "ravi").await;
    let owner = register(&store, "lakshmi").await;
    let target = set_biodata(&store, owner, "Female", (1995, 4, 2)).await;

    let uploads = vec![jpeg("a.jpg"), jpeg("b.jpg"), jpeg("c.jpg")];
    upload_photos(&store, &media, owner, uploads, &PhotoLimits::default())
        .await
        .unwrap();

    let err = credits::profile_detail(&store, viewer, target).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    credits::unlock(&store, viewer, target).await.unwrap();
    let detail = credits::profile_detail(&store, viewer, target).await.unwrap();
    assert_eq!(detail.profile.id, target);
    assert_eq!(detail.photos.len(), 3);
    assert!(detail.photos.iter().all(|p| p.image.starts_with("/media/profile_photos/")));

    let _ = tokio::fs::remove_dir_all(media.root()).await;
}

#[tokio::test]
async fn test_unlocked_profiles_newest_first() {
    let store = MemoryStore::new();
    let viewer = register(&store, "ravi").await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(store.get_or_create_profile(Uuid::new_v4()).await.unwrap().id);
    }
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    for target in [b, a, c] {
        credits::unlock(&store, viewer, target).await.unwrap();
    }

    let unlocked = credits::unlocked_profiles(&store, viewer).await.unwrap();
    let order: Vec<i64> = unlocked.iter().map(|p| p.profile.id).collect();
    assert_eq!(order, vec![c, a, b]);
}

#[tokio::test]
async fn test_purchase_adds_credits_and_ledger_entry() {
    let store = MemoryStore::new();
    let viewer = register(&store, "ravi").await;

    let balance = credits::purchase(&store, viewer, 10, 100).await.unwrap();
    assert_eq!(balance, 30);

    assert!(credits::purchase(&store, viewer, 0, 100).await.is_err());
    assert!(credits::purchase(&store, viewer, 101, 100).await.is_err());

    let (balance, ledger) = credits::ledger(&store, viewer).await.unwrap();
    assert_eq!(balance, 30);
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].kind, TransactionKind::Purchase);
    assert_eq!(ledger[0].profile_id, None);
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let store = MemoryStore::new();
    let err = accounts::register(
        &store,
        RegisterRequest {
            username: "ravi".to_string(),
            email: "ravi@example.com".to_string(),
            password: "correct-horse".to_string(),
            password2: "battery-staple".to_string(),
            phone_number: None,
        },
        SIGNUP_GRANT,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(store.find_account_by_username("ravi").await.unwrap().is_none());
}

#[tokio::test]
async fn test_register_with_blank_phone_stores_none() {
    let store = MemoryStore::new();
    let mut phone_numbers = Vec::new();

    for (username, phone) in [("ravi", ""), ("meera", "   ")] {
        let account = accounts::register(
            &store,
            RegisterRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "correct-horse".to_string(),
                password2: "correct-horse".to_string(),
                phone_number: Some(phone.to_string()),
            },
            SIGNUP_GRANT,
        )
        .await
        .unwrap();
        phone_numbers.push(account.phone_number);
    }

    // Blank phones do not collide on uniqueness
    assert_eq!(phone_numbers, vec![None, None]);
}
