// src/common/signatures.rs
//
// Verificação das assinaturas dos webhooks de pagamento. Funções puras:
// quem chama decide o que fazer com um `false`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

// Janela aceita entre o timestamp assinado e o relógio do servidor.
pub const STRIPE_TOLERANCE_SECS: i64 = 300;

pub fn hmac_sha256_hex(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC aceita chave de qualquer tamanho");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Checksum da Wompi: hex(HMAC-SHA256(secret, corpo bruto)), comparado
/// com o header `x-message-integrity-checksum`. Os digests têm tamanho
/// fixo, então a comparação de strings é suficiente.
pub fn verify_wompi_signature(secret: &str, body: &[u8], provided: &str) -> bool {
    hmac_sha256_hex(secret, body) == provided
}

/// Header `stripe-signature` decomposto: `t=<unix>,v1=<hex>[,v1=<hex>...]`.
/// Chaves desconhecidas (ex.: `v0`) são ignoradas.
#[derive(Debug, PartialEq)]
pub struct StripeSignature {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

pub fn parse_stripe_signature(header: &str) -> Option<StripeSignature> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp?;
    if signatures.is_empty() {
        return None;
    }

    Some(StripeSignature {
        timestamp,
        signatures,
    })
}

/// Esquema da Stripe: o payload assinado é `"{t}.{corpo bruto}"` e basta
/// um dos `v1` conferir. O timestamp precisa estar dentro da janela de
/// tolerância em relação a `now` (unix, em segundos).
pub fn verify_stripe_signature(secret: &str, header: &str, body: &[u8], now: i64) -> bool {
    let Some(parsed) = parse_stripe_signature(header) else {
        return false;
    };

    if (now - parsed.timestamp).abs() > STRIPE_TOLERANCE_SECS {
        return false;
    }

    let mut signed_payload = Vec::with_capacity(body.len() + 16);
    signed_payload.extend_from_slice(parsed.timestamp.to_string().as_bytes());
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(body);

    let expected = hmac_sha256_hex(secret, &signed_payload);
    parsed.signatures.iter().any(|candidate| candidate == &expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_123";

    fn stripe_header(secret: &str, body: &[u8], timestamp: i64) -> String {
        let mut signed_payload = timestamp.to_string().into_bytes();
        signed_payload.push(b'.');
        signed_payload.extend_from_slice(body);
        format!("t={},v1={}", timestamp, hmac_sha256_hex(secret, &signed_payload))
    }

    #[test]
    fn wompi_accepts_matching_checksum() {
        let body = br#"{"data":{"transaction":{"id":"tx-1","reference":"reg-1"}}}"#;
        let checksum = hmac_sha256_hex(SECRET, body);
        assert!(verify_wompi_signature(SECRET, body, &checksum));
    }

    #[test]
    fn wompi_rejects_wrong_checksum() {
        let body = b"{}";
        assert!(!verify_wompi_signature(SECRET, body, "deadbeef"));
    }

    #[test]
    fn wompi_rejects_tampered_body() {
        let checksum = hmac_sha256_hex(SECRET, b"{\"amount\":150000}");
        assert!(!verify_wompi_signature(SECRET, b"{\"amount\":1}", &checksum));
    }

    #[test]
    fn stripe_accepts_valid_signature() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let now = 1_700_000_000;
        let header = stripe_header(SECRET, body, now);
        assert!(verify_stripe_signature(SECRET, &header, body, now));
    }

    #[test]
    fn stripe_accepts_within_tolerance() {
        let body = b"{}";
        let now = 1_700_000_000;
        let header = stripe_header(SECRET, body, now - STRIPE_TOLERANCE_SECS);
        assert!(verify_stripe_signature(SECRET, &header, body, now));
    }

    #[test]
    fn stripe_rejects_expired_timestamp() {
        let body = b"{}";
        let now = 1_700_000_000;
        let header = stripe_header(SECRET, body, now - STRIPE_TOLERANCE_SECS - 1);
        assert!(!verify_stripe_signature(SECRET, &header, body, now));
    }

    #[test]
    fn stripe_rejects_tampered_body() {
        let now = 1_700_000_000;
        let header = stripe_header(SECRET, b"{\"a\":1}", now);
        assert!(!verify_stripe_signature(SECRET, &header, b"{\"a\":2}", now));
    }

    #[test]
    fn stripe_rejects_wrong_secret() {
        let body = b"{}";
        let now = 1_700_000_000;
        let header = stripe_header("whsec_otro", body, now);
        assert!(!verify_stripe_signature(SECRET, &header, body, now));
    }

    #[test]
    fn stripe_accepts_any_matching_v1() {
        let body = b"{}";
        let now = 1_700_000_000;
        let valid = stripe_header(SECRET, body, now);
        // Primeiro v1 inválido, segundo válido.
        let header = valid.replacen("v1=", "v1=0000,v1=", 1);
        assert!(verify_stripe_signature(SECRET, &header, body, now));
    }

    #[test]
    fn stripe_parse_ignores_unknown_schemes() {
        let parsed = parse_stripe_signature("t=123,v0=aaa,v1=bbb").unwrap();
        assert_eq!(parsed.timestamp, 123);
        assert_eq!(parsed.signatures, vec!["bbb".to_string()]);
    }

    #[test]
    fn stripe_parse_requires_timestamp_and_v1() {
        assert!(parse_stripe_signature("v1=bbb").is_none());
        assert!(parse_stripe_signature("t=123").is_none());
        assert!(parse_stripe_signature("lixo").is_none());
        assert!(parse_stripe_signature("t=abc,v1=bbb").is_none());
    }
}
