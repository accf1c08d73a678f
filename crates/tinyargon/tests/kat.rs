use eyre::Result;
use hex_literal::hex;
use tinyargon::{Block, EngineInstance, HashRequest, Variant, Version};

const PASSWORD: [u8; 32] = [1; 32];
const SALT: [u8; 16] = [2; 16];
const SECRET: [u8; 8] = [3; 8];
const AD: [u8; 12] = [4; 12];

fn rfc_request(variant: Variant) -> HashRequest<'static> {
    HashRequest::new(&PASSWORD, &SALT)
        .with_variant(variant)
        .with_version(Version::V0x13)
        .with_secret(&SECRET)
        .with_associated_data(&AD)
        .with_lanes(4)
        .with_memory_cost(32)
        .with_time_cost(3)
        .with_output_len(32)
}

#[test]
fn test_rfc_argon2d() -> Result<()> {
    let tag = tinyargon::hash(&rfc_request(Variant::Argon2d))?;
    assert_eq!(tag[..], hex!("512b391b6f1162975371d30919734294f868e3be3984f3c1a13a4db9fabe4acb"));
    Ok(())
}

#[test]
fn test_rfc_argon2i() -> Result<()> {
    let tag = tinyargon::hash(&rfc_request(Variant::Argon2i))?;
    assert_eq!(tag[..], hex!("c814d9d1dc7f37aa13f0d77f2494bda1c8de6b016dd388d29952a4c4672b6ce8"));
    Ok(())
}

#[test]
fn test_rfc_argon2id() -> Result<()> {
    let tag = tinyargon::hash(&rfc_request(Variant::Argon2id))?;
    assert_eq!(tag[..], hex!("0d640df58d78766c08c037a34a8b53c9d01ef0452d75b65eb52520e96b01e659"));
    Ok(())
}

#[test]
fn test_rfc_argon2id_single_thread() -> Result<()> {
    let tag = tinyargon::hash(&rfc_request(Variant::Argon2id).with_threads(1))?;
    assert_eq!(tag[..], hex!("0d640df58d78766c08c037a34a8b53c9d01ef0452d75b65eb52520e96b01e659"));
    Ok(())
}

#[test]
fn test_rfc_borrowed_work_area() -> Result<()> {
    let request = rfc_request(Variant::Argon2id);
    let instance = EngineInstance::new(&request)?;
    let mut work_area = vec![Block::ZERO; instance.block_count()];
    let mut out = [0u8; 32];

    tinyargon::compute(&request, &mut work_area, &mut out)?;
    assert_eq!(out, hex!("0d640df58d78766c08c037a34a8b53c9d01ef0452d75b65eb52520e96b01e659"));
    tinyargon::verify(&request, &out, &mut work_area)?;
    Ok(())
}

// 64 MiB, the host library's default memory size
#[test]
fn test_argon2i_64mib() -> Result<()> {
    let request = HashRequest::new(b"password", b"somesalt")
        .with_variant(Variant::Argon2i)
        .with_time_cost(2)
        .with_memory_cost(1 << 16)
        .with_lanes(1);

    let tag = tinyargon::hash(&request)?;
    assert_eq!(tag[..], hex!("c1628832147d9720c5bd1cfd61367078729f6dfb6f8fea9ff98158e0d7816ed0"));
    tinyargon::verify_hash(&request, &tag)?;
    Ok(())
}

#[test]
fn test_minimum_memory_is_rounded_up() -> Result<()> {
    // 8 * lanes blocks is the floor, so both requests use the same matrix size
    let request = HashRequest::new(b"password", b"somesalt").with_lanes(2).with_memory_cost(16);
    assert_eq!(EngineInstance::new(&request)?.block_count(), 16);
    assert_eq!(EngineInstance::new(&request.with_memory_cost(23))?.block_count(), 16);

    // but the requested cost still enters H0
    assert_ne!(tinyargon::hash(&request)?, tinyargon::hash(&request.with_memory_cost(23))?);
    Ok(())
}

#[test]
fn test_version_0x10_differs() -> Result<()> {
    let v13 = tinyargon::hash(&rfc_request(Variant::Argon2id))?;
    let v10 = tinyargon::hash(&rfc_request(Variant::Argon2id).with_version(Version::V0x10))?;
    assert_ne!(v13, v10);
    assert_eq!(v10.len(), 32);
    Ok(())
}
