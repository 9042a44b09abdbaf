use lopdf::encryption::DecryptionError;
use lopdf::{Document, Object};

use crate::document::{DocumentError, Result};

use super::save;

/// The only security handler lopdf can decrypt
const STANDARD_HANDLER: &[u8] = b"Standard";

/// Remove password protection, saving the document in the clear
pub fn decrypt(bytes: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes).map_err(|e| DocumentError::Load(e.to_string()))?;

    if !doc.is_encrypted() {
        return Err(DocumentError::NotEncrypted);
    }
    check_handler(&doc)?;

    doc.decrypt(password).map_err(|e| match &e {
        lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => {
            tracing::debug!("Decryption rejected: {}", e);
            DocumentError::WrongPassword
        }
        lopdf::Error::Decryption(reason) => {
            tracing::debug!("Cannot decrypt document: {}", reason);
            DocumentError::UnsupportedEncryption(reason.to_string())
        }
        other => DocumentError::Structure(other.to_string()),
    })?;
    doc.trailer.remove(b"Encrypt");
    doc.prune_objects();

    tracing::info!("Decrypted document with {} pages", doc.get_pages().len());
    save(&mut doc)
}

/// Reject security handlers other than the password-based one
fn check_handler(doc: &Document) -> Result<()> {
    let dict = doc
        .get_encrypted()
        .map_err(|e| DocumentError::UnsupportedEncryption(e.to_string()))?;

    let filter = dict
        .get(b"Filter")
        .and_then(Object::as_name)
        .map_err(|_| DocumentError::UnsupportedEncryption("missing security handler".to_string()))?;

    if filter != STANDARD_HANDLER {
        return Err(DocumentError::UnsupportedEncryption(format!(
            "security handler /{}",
            String::from_utf8_lossy(filter)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixtures::{
        contents_decode, encrypted_with, page_widths, pdf, rc4_encrypted, RC4_USER_PASSWORD,
    };
    use lopdf::dictionary;

    #[test]
    fn test_plain_document_is_not_encrypted() {
        assert!(matches!(decrypt(&pdf(1), ""), Err(DocumentError::NotEncrypted)));
        assert!(matches!(decrypt(&pdf(1), "secret"), Err(DocumentError::NotEncrypted)));
    }

    #[test]
    fn test_garbage_is_a_load_error() {
        assert!(matches!(decrypt(b"%PDF-", "x"), Err(DocumentError::Load(_))));
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        for password in ["", "wrong", "secret2"] {
            assert!(matches!(
                decrypt(rc4_encrypted(), password),
                Err(DocumentError::WrongPassword)
            ));
        }
    }

    #[test]
    fn test_correct_password_strips_encryption() {
        let out = decrypt(rc4_encrypted(), RC4_USER_PASSWORD).unwrap();

        let doc = Document::load_mem(&out).unwrap();
        assert!(!doc.is_encrypted());
        assert!(doc.trailer.get(b"Encrypt").is_err());
        assert_eq!(page_widths(&out), vec![200.0]);
        assert!(contents_decode(&out));
    }

    #[test]
    fn test_aes_revision_is_unsupported() {
        let v4 = encrypted_with(dictionary! {
            "Filter" => "Standard",
            "V" => 4,
            "R" => 4,
        });
        assert!(matches!(
            decrypt(&v4, ""),
            Err(DocumentError::UnsupportedEncryption(_))
        ));
    }

    #[test]
    fn test_public_key_handler_is_unsupported() {
        let pubsec = encrypted_with(dictionary! {
            "Filter" => "Adobe.PubSec",
            "V" => 1,
            "R" => 2,
        });
        let Err(DocumentError::UnsupportedEncryption(reason)) = decrypt(&pubsec, "") else {
            panic!("expected unsupported encryption");
        };
        assert!(reason.contains("Adobe.PubSec"));
    }
}
