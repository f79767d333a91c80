//! The digital signature envelope
//!
//! Signing happens in two phases around serialization. `prepare` adds the
//! signature dictionary (with ByteRange and Contents placeholders) and the
//! invisible signature widget to the document; the builder session wires
//! them into the first page, the AcroForm and, for certification
//! signatures, the DocMDP permissions entry. After the document is
//! serialized, `finalize` locates the placeholders in the byte stream,
//! patches the ByteRange in place, digests the signed ranges and embeds a
//! detached PKCS#7/CMS `SignedData` as uppercase hex.

use crate::builder::SignatureRefs;
use crate::options::SignatureOptions;
use crate::types::{ComposeError, Result};
use cms::builder::{SignedDataBuilder, SignerInfoBuilder};
use cms::cert::{CertificateChoices, IssuerAndSerialNumber};
use cms::signed_data::{EncapsulatedContentInfo, SignerIdentifier};
use der::{Decode, Encode};
use lopdf::{Dictionary, Document, Object, StringFormat};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use sha2::{Digest, Sha256};
use std::path::Path;
use x509_cert::spki::AlgorithmIdentifierOwned;
use x509_cert::Certificate;

/// Reserved space for the DER-encoded signature, in bytes
const PLACEHOLDER_BYTES: usize = 8192;

/// Reserved digits for each ByteRange offset
const BYTE_RANGE_RESERVED: i64 = 1_000_000_000;

/// Add the signature dictionary and widget field to the document
pub(crate) fn prepare(doc: &mut Document, options: &SignatureOptions) -> Result<SignatureRefs> {
    let mut sig = Dictionary::new();
    sig.set("Type", Object::Name(b"Sig".to_vec()));
    sig.set("Filter", Object::Name(b"Adobe.PPKLite".to_vec()));
    sig.set("SubFilter", Object::Name(b"adbe.pkcs7.detached".to_vec()));
    sig.set(
        "ByteRange",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(BYTE_RANGE_RESERVED),
            Object::Integer(BYTE_RANGE_RESERVED),
            Object::Integer(BYTE_RANGE_RESERVED),
        ]),
    );
    sig.set(
        "Contents",
        Object::String(vec![0u8; PLACEHOLDER_BYTES], StringFormat::Hexadecimal),
    );
    let date = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    sig.set("M", Object::string_literal(date));

    for (key, value) in &options.info {
        match key.as_str() {
            "Name" | "Location" | "Reason" | "ContactInfo" => {
                sig.set(key.as_bytes(), Object::string_literal(value.clone()));
            }
            other => log::debug!("ignoring unknown signature info key {other:?}"),
        }
    }

    if !options.approval {
        let mut params = Dictionary::new();
        params.set("Type", Object::Name(b"TransformParams".to_vec()));
        params.set("P", Object::Integer(options.cert_type as i64));
        params.set("V", Object::Name(b"1.2".to_vec()));
        let mut reference = Dictionary::new();
        reference.set("Type", Object::Name(b"SigRef".to_vec()));
        reference.set("TransformMethod", Object::Name(b"DocMDP".to_vec()));
        reference.set("TransformParams", Object::Dictionary(params));
        sig.set("Reference", Object::Array(vec![Object::Dictionary(reference)]));
    }
    let sig_id = doc.add_object(sig);

    let mut field = Dictionary::new();
    field.set("Type", Object::Name(b"Annot".to_vec()));
    field.set("Subtype", Object::Name(b"Widget".to_vec()));
    field.set("FT", Object::Name(b"Sig".to_vec()));
    field.set("T", Object::string_literal("Signature1"));
    field.set(
        "Rect",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(0),
        ]),
    );
    field.set("F", Object::Integer(132));
    field.set("V", Object::Reference(sig_id));
    let field_id = doc.add_object(field);

    Ok(SignatureRefs {
        field: field_id,
        sig: sig_id,
        certification: !options.approval,
    })
}

/// Patch the serialized document and embed the CMS signature
pub(crate) fn finalize(mut bytes: Vec<u8>, options: &SignatureOptions) -> Result<Vec<u8>> {
    let (start, end) = locate_contents_gap(&bytes).ok_or_else(|| {
        ComposeError::Signature("signature placeholder not found in output".to_string())
    })?;
    let byte_range = [0i64, start as i64, end as i64, (bytes.len() - end) as i64];
    patch_byte_range(&mut bytes, &byte_range)?;

    let mut signed = Vec::with_capacity(bytes.len() - (end - start));
    signed.extend_from_slice(&bytes[..start]);
    signed.extend_from_slice(&bytes[end..]);
    let digest = Sha256::digest(&signed).to_vec();

    let der = sign_digest(&digest, options)?;
    insert_signature(&mut bytes, start, end, &der)?;
    Ok(bytes)
}

// =============================================================================
// Placeholder bookkeeping
// =============================================================================

/// Find the hex string gap of the signature dictionary's /Contents value.
///
/// Page /Contents entries are indirect references, so the only /Contents
/// key followed by a hex string (`<` not opening a dictionary) is the
/// signature's. Returns the byte span including the angle brackets.
fn locate_contents_gap(bytes: &[u8]) -> Option<(usize, usize)> {
    let needle = b"/Contents";
    let mut from = 0;
    while let Some(pos) = find(bytes, needle, from) {
        let mut i = pos + needle.len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'<' && bytes.get(i + 1) != Some(&b'<') {
            let close = find(bytes, b">", i)?;
            return Some((i, close + 1));
        }
        from = pos + needle.len();
    }
    None
}

/// Overwrite the ByteRange array in place, space-padded to its
/// serialized length
fn patch_byte_range(bytes: &mut [u8], byte_range: &[i64; 4]) -> Result<()> {
    let key = find(bytes, b"/ByteRange", 0)
        .ok_or_else(|| ComposeError::Signature("ByteRange entry not found".to_string()))?;
    let open = find(bytes, b"[", key)
        .ok_or_else(|| ComposeError::Signature("malformed ByteRange entry".to_string()))?;
    let close = find(bytes, b"]", open)
        .ok_or_else(|| ComposeError::Signature("malformed ByteRange entry".to_string()))?;

    let replacement = format!(
        "[{} {} {} {}",
        byte_range[0], byte_range[1], byte_range[2], byte_range[3]
    );
    let slot = close - open;
    if replacement.len() > slot {
        return Err(ComposeError::Signature(
            "ByteRange does not fit its placeholder".to_string(),
        ));
    }
    let mut padded = replacement.into_bytes();
    padded.resize(slot, b' ');
    bytes[open..close].copy_from_slice(&padded);
    Ok(())
}

/// Write the DER signature as uppercase hex into the placeholder gap
fn insert_signature(bytes: &mut [u8], start: usize, end: usize, der: &[u8]) -> Result<()> {
    let hex = bytes_to_hex(der);
    let gap = end - start - 2;
    if hex.len() > gap {
        return Err(ComposeError::Signature(format!(
            "signature of {} bytes exceeds the {}-byte placeholder",
            der.len(),
            gap / 2
        )));
    }
    bytes[start + 1..start + 1 + hex.len()].copy_from_slice(hex.as_bytes());
    Ok(())
}

fn bytes_to_hex(data: &[u8]) -> String {
    const HEX: &[u8] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(data.len() * 2);
    for &byte in data {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0F) as usize] as char);
    }
    out
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

// =============================================================================
// CMS signing
// =============================================================================

/// Produce the detached PKCS#7 SignedData over an externally computed digest
fn sign_digest(digest: &[u8], options: &SignatureOptions) -> Result<Vec<u8>> {
    let mut certs = load_certificates(&options.certificate)?;
    if certs.is_empty() {
        return Err(ComposeError::Signature(format!(
            "no certificate found in {}",
            options.certificate.display()
        )));
    }
    if let Some(extra) = &options.extra_certs {
        certs.extend(load_certificates(extra)?);
    }
    let key = load_private_key(&options.private_key, &options.password)?;
    build_signed_data(digest, key, certs)
}

fn build_signed_data(
    digest: &[u8],
    key: RsaPrivateKey,
    certs: Vec<Certificate>,
) -> Result<Vec<u8>> {
    let signer_cert = certs[0].clone();
    let signing_key = SigningKey::<Sha256>::new(key);
    let digest_algorithm = AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc5912::ID_SHA_256,
        parameters: None,
    };
    let content = EncapsulatedContentInfo {
        econtent_type: const_oid::db::rfc5911::ID_DATA,
        econtent: None,
    };
    let sid = SignerIdentifier::IssuerAndSerialNumber(IssuerAndSerialNumber {
        issuer: signer_cert.tbs_certificate.issuer.clone(),
        serial_number: signer_cert.tbs_certificate.serial_number.clone(),
    });

    let signer_info = SignerInfoBuilder::new(
        &signing_key,
        sid,
        digest_algorithm.clone(),
        &content,
        Some(digest),
    )
    .map_err(cms_err)?;

    let mut builder = SignedDataBuilder::new(&content);
    builder.add_digest_algorithm(digest_algorithm).map_err(cms_err)?;
    for cert in certs {
        builder
            .add_certificate(CertificateChoices::Certificate(cert))
            .map_err(cms_err)?;
    }
    builder
        .add_signer_info::<SigningKey<Sha256>, rsa::pkcs1v15::Signature>(signer_info)
        .map_err(cms_err)?;
    let content_info = builder.build().map_err(cms_err)?;

    content_info
        .to_der()
        .map_err(|e| ComposeError::Signature(format!("cannot encode signature: {e}")))
}

fn load_certificates(path: &Path) -> Result<Vec<Certificate>> {
    let data = std::fs::read(path)?;
    let parse_err = |e: der::Error| {
        ComposeError::Signature(format!("cannot parse certificate {}: {e}", path.display()))
    };
    if data.starts_with(b"-----") {
        Certificate::load_pem_chain(&data).map_err(parse_err)
    } else {
        Ok(vec![Certificate::from_der(&data).map_err(parse_err)?])
    }
}

fn load_private_key(path: &Path, password: &str) -> Result<RsaPrivateKey> {
    let data = std::fs::read(path)?;
    let key_err = |e: String| {
        ComposeError::Signature(format!("cannot load private key {}: {e}", path.display()))
    };
    if data.starts_with(b"-----") {
        let pem = std::str::from_utf8(&data).map_err(|e| key_err(e.to_string()))?;
        if password.is_empty() {
            RsaPrivateKey::from_pkcs8_pem(pem)
                .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
                .map_err(|e| key_err(e.to_string()))
        } else {
            RsaPrivateKey::from_pkcs8_encrypted_pem(pem, password.as_bytes())
                .map_err(|e| key_err(e.to_string()))
        }
    } else if password.is_empty() {
        RsaPrivateKey::from_pkcs8_der(&data)
            .or_else(|_| RsaPrivateKey::from_pkcs1_der(&data))
            .map_err(|e| key_err(e.to_string()))
    } else {
        RsaPrivateKey::from_pkcs8_encrypted_der(&data, password.as_bytes())
            .map_err(|e| key_err(e.to_string()))
    }
}

fn cms_err(e: impl std::fmt::Display) -> ComposeError {
    ComposeError::Signature(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_uppercase_and_padded() {
        assert_eq!(bytes_to_hex(&[0x00, 0x0a, 0xff]), "000AFF");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn locates_the_hex_contents_only() {
        let data: &[u8] =
            b"<< /Contents 3 0 R >> << /ByteRange [0 1 2 3] /Contents <00000000> >> trailer";
        let (start, end) = locate_contents_gap(data).unwrap();
        assert_eq!(&data[start..end], b"<00000000>");
    }

    #[test]
    fn ignores_dictionary_open_after_contents() {
        let data: &[u8] = b"/Contents << /Length 1 >>";
        assert!(locate_contents_gap(data).is_none());
    }

    #[test]
    fn patches_byte_range_in_place() {
        let mut data =
            b"/ByteRange [0 1000000000 1000000000 1000000000] /Contents <00>".to_vec();
        let original_len = data.len();
        patch_byte_range(&mut data, &[0, 120, 240, 360]).unwrap();
        assert_eq!(data.len(), original_len);
        let text = String::from_utf8(data).unwrap();
        assert!(text.contains("[0 120 240 360"));
        assert!(text.contains("] /Contents"));
    }

    #[test]
    fn inserts_signature_into_gap() {
        let mut data = b"x<000000000000>y".to_vec();
        insert_signature(&mut data, 1, 15, &[0xab, 0xcd]).unwrap();
        assert_eq!(&data, b"x<ABCD00000000>y");
    }

    #[test]
    fn rejects_oversized_signature() {
        let mut data = b"<0000>".to_vec();
        let err = insert_signature(&mut data, 0, 6, &[1, 2, 3, 4]).unwrap_err();
        assert!(matches!(err, ComposeError::Signature(_)));
    }

    #[test]
    fn byte_range_spans_the_whole_file() {
        // Mirror of the arithmetic in finalize
        let len = 1000usize;
        let (start, end) = (400usize, 502usize);
        let byte_range = [0i64, start as i64, end as i64, (len - end) as i64];
        assert_eq!(byte_range[1] as usize + (end - start) + byte_range[3] as usize, len);
    }
}
