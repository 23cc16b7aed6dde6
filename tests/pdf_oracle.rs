//! The lopdf-backed oracle against real documents: plain, broken, and
//! encrypted with each standard security handler revision lopdf can write.

use std::collections::BTreeMap;
use std::sync::Arc;

use lopdf::encryption::crypt_filters::{Aes128CryptFilter, Aes256CryptFilter, CryptFilter};
use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, Permissions, StringFormat, dictionary,
};

use pdf_pwsearch::{
    LockedDocument, Oracle, PdfOracle, SearchBudget, SearchError, SearchMode, SearchResult,
    Verdict, search,
};

const OWNER_PASSWORD: &str = "owner-only";

#[derive(Clone, Copy, Debug)]
enum Handler {
    /// RC4, 128-bit key (revision 3).
    Rc4,
    /// AES-128 crypt filters (revision 4).
    Aes128,
    /// AES-256 crypt filters (revision 6).
    Aes256,
}

const HANDLERS: [Handler; 3] = [Handler::Rc4, Handler::Aes128, Handler::Aes256];

/// A one-page PDF with no encryption dictionary.
fn plain_pdf() -> Vec<u8> {
    save(one_page_document())
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// The same page, locked with `user_password` under `handler`.
fn encrypted_pdf(handler: Handler, user_password: &str) -> LockedDocument {
    let mut doc = one_page_document();
    let file_key = [7u8; 32];
    let version = match handler {
        Handler::Rc4 => EncryptionVersion::V2 {
            document: &doc,
            owner_password: OWNER_PASSWORD,
            user_password,
            key_length: 128,
            permissions: Permissions::all(),
        },
        Handler::Aes128 => {
            let filter: Arc<dyn CryptFilter> = Arc::new(Aes128CryptFilter);
            EncryptionVersion::V4 {
                document: &doc,
                encrypt_metadata: true,
                crypt_filters: BTreeMap::from([(b"StdCF".to_vec(), filter)]),
                stream_filter: b"StdCF".to_vec(),
                string_filter: b"StdCF".to_vec(),
                owner_password: OWNER_PASSWORD,
                user_password,
                permissions: Permissions::all(),
            }
        }
        Handler::Aes256 => {
            let filter: Arc<dyn CryptFilter> = Arc::new(Aes256CryptFilter);
            EncryptionVersion::V5 {
                encrypt_metadata: true,
                crypt_filters: BTreeMap::from([(b"StdCF".to_vec(), filter)]),
                file_encryption_key: &file_key,
                stream_filter: b"StdCF".to_vec(),
                string_filter: b"StdCF".to_vec(),
                owner_password: OWNER_PASSWORD,
                user_password,
                permissions: Permissions::all(),
            }
        }
    };
    let state = EncryptionState::try_from(version).unwrap();
    doc.encrypt(&state).unwrap();
    LockedDocument::from_bytes(save(doc))
}

fn one_page_document() -> Document {
    let mut doc = Document::with_version("1.5");
    // The RC4 and AES-128 handlers key off the first file identifier.
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(b"0123456789abcdef".to_vec(), StringFormat::Literal),
            Object::String(b"fedcba9876543210".to_vec(), StringFormat::Literal),
        ]),
    );
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

#[test]
fn test_unencrypted_pdf_is_rejected() {
    let document = LockedDocument::from_bytes(plain_pdf());
    assert!(matches!(
        PdfOracle.open(&document),
        Err(SearchError::NotEncrypted)
    ));
}

#[test]
fn test_search_refuses_unencrypted_pdf_before_starting() {
    let document = LockedDocument::from_bytes(plain_pdf());
    let err = search(
        &PdfOracle,
        &document,
        &SearchMode::brute_force("0123456789", 2),
        SearchBudget::unbounded(),
        4,
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::NotEncrypted));
}

#[test]
fn test_truncated_pdf_fails_to_open() {
    let mut bytes = plain_pdf();
    bytes.truncate(12);
    let err = search(
        &PdfOracle,
        &LockedDocument::from_bytes(bytes),
        &SearchMode::dictionary(["a", "b"]),
        SearchBudget::unbounded(),
        1,
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::Document(_)));
}

#[test]
fn test_verify_against_each_handler() {
    for handler in HANDLERS {
        let handle = PdfOracle.open(&encrypted_pdf(handler, "secret")).unwrap();
        assert_eq!(
            PdfOracle.verify(&handle, "secret"),
            Verdict::Unlocked,
            "{handler:?}"
        );
        assert_eq!(
            PdfOracle.verify(&handle, "Secret"),
            Verdict::WrongPassword,
            "{handler:?}"
        );
    }
}

#[test]
fn test_dictionary_search_finds_user_password() {
    for handler in HANDLERS {
        let document = encrypted_pdf(handler, "secret");
        let result = search(
            &PdfOracle,
            &document,
            &SearchMode::dictionary(["letmein", "password", "secret", "hunter2"]),
            SearchBudget::unbounded(),
            2,
        )
        .unwrap();
        assert_eq!(result.password(), Some("secret"), "{handler:?}");
    }
}

#[test]
fn test_brute_force_search_finds_user_password() {
    for handler in HANDLERS {
        let document = encrypted_pdf(handler, "42");
        let result = search(
            &PdfOracle,
            &document,
            &SearchMode::brute_force("0123456789", 2),
            SearchBudget::unbounded(),
            4,
        )
        .unwrap();
        match result {
            SearchResult::Found {
                password, index, ..
            } => {
                assert_eq!(password, "42", "{handler:?}");
                assert_eq!(index, 42, "{handler:?}");
            }
            other => panic!("{handler:?}: expected a match, got {other:?}"),
        }
    }
}

#[test]
fn test_wrong_wordlist_exhausts_without_failing() {
    let document = encrypted_pdf(Handler::Aes128, "secret");
    let result = search(
        &PdfOracle,
        &document,
        &SearchMode::dictionary(["a", "b", "c"]),
        SearchBudget::unbounded(),
        1,
    )
    .unwrap();
    assert!(matches!(result, SearchResult::Exhausted { attempts: 3, .. }));
}

#[test]
fn test_saslprep_rejected_candidate_does_not_end_search() {
    // A BEL character cannot pass SASLprep, so the AES-256 handler refuses
    // it before hashing. The entries after it must still be tried.
    let document = encrypted_pdf(Handler::Aes256, "secret");
    let handle = PdfOracle.open(&document).unwrap();
    assert_eq!(PdfOracle.verify(&handle, "bell\u{7}"), Verdict::WrongPassword);

    let result = search(
        &PdfOracle,
        &document,
        &SearchMode::dictionary(["wrong", "bell\u{7}", "secret"]),
        SearchBudget::unbounded(),
        1,
    )
    .unwrap();
    match result {
        SearchResult::Found {
            password,
            index,
            attempts,
            ..
        } => {
            assert_eq!(password, "secret");
            assert_eq!(index, 2);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn test_confirm_decrypts_with_found_password() {
    for handler in HANDLERS {
        let document = encrypted_pdf(handler, "secret");
        PdfOracle.confirm(&document, "secret").unwrap();
        assert!(
            matches!(
                PdfOracle.confirm(&document, "nope"),
                Err(SearchError::Document(_))
            ),
            "{handler:?}"
        );
    }
}

#[test]
fn test_confirm_refuses_unencrypted_pdf() {
    let document = LockedDocument::from_bytes(plain_pdf());
    assert!(matches!(
        PdfOracle.confirm(&document, "anything"),
        Err(SearchError::NotEncrypted)
    ));
}
