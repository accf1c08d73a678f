use eyre::Result;
use hex_literal::hex;
use tinyargon::{Block, Error, HashRequest, ParamError, STATUS_OK, Variant};
use tinyargon_wasm::surface::{RawRequest, STATUS_DIFFERENT, blake2b_raw, compare_raw, hash_raw, verify_raw, wipe_raw};

/// Host-side buffers for one call, owned by the test like `m` allocations are owned by the module
struct Buffers {
    password: Vec<u8>,
    salt: Vec<u8>,
    key: Vec<u8>,
    ad: Vec<u8>,
    work_area: Vec<Block>,
}

impl Buffers {
    fn new(password: &[u8], salt: &[u8], nb_blocks: u32) -> Self {
        Self {
            password: password.to_vec(),
            salt: salt.to_vec(),
            key: Vec::new(),
            ad: Vec::new(),
            work_area: vec![Block::ZERO; nb_blocks as usize],
        }
    }

    fn request(&mut self, algorithm: u32, nb_passes: u32, nb_lanes: u32) -> RawRequest {
        RawRequest {
            algorithm,
            version: 0x13,
            nb_blocks: self.work_area.len() as u32,
            nb_passes,
            nb_lanes,
            pass: self.password.as_mut_ptr(),
            pass_size: self.password.len() as u32,
            salt: self.salt.as_ptr(),
            salt_size: self.salt.len() as u32,
            key: if self.key.is_empty() { std::ptr::null_mut() } else { self.key.as_mut_ptr() },
            key_size: self.key.len() as u32,
            ad: if self.ad.is_empty() { std::ptr::null() } else { self.ad.as_ptr() },
            ad_size: self.ad.len() as u32,
        }
    }

    fn hash(&mut self, request: &RawRequest, out: &mut [u8]) -> i32 {
        let work_area = self.work_area.as_mut_ptr().cast::<u8>();
        unsafe { hash_raw(out.as_mut_ptr(), out.len() as u32, work_area, request) }
    }

    fn verify(&mut self, request: &RawRequest, expected: &[u8]) -> i32 {
        let work_area = self.work_area.as_mut_ptr().cast::<u8>();
        unsafe { verify_raw(expected.as_ptr(), expected.len() as u32, work_area, request) }
    }
}

#[test]
fn test_hash_matches_engine() -> Result<()> {
    let mut buffers = Buffers::new(b"password", b"somesalt", 64);
    buffers.key = b"pepper".to_vec();
    buffers.ad = b"context".to_vec();
    let request = buffers.request(2, 2, 2);

    let mut out = [0u8; 32];
    assert_eq!(buffers.hash(&request, &mut out), STATUS_OK);

    let expected = tinyargon::hash(
        &HashRequest::new(b"password", b"somesalt")
            .with_variant(Variant::Argon2id)
            .with_memory_cost(64)
            .with_time_cost(2)
            .with_lanes(2)
            .with_secret(b"pepper")
            .with_associated_data(b"context"),
    )?;
    assert_eq!(out[..], expected[..]);
    Ok(())
}

#[test]
fn test_rfc_argon2id_through_surface() -> Result<()> {
    let mut buffers = Buffers::new(&[1; 32], &[2; 16], 32);
    buffers.key = vec![3; 8];
    buffers.ad = vec![4; 12];
    let request = buffers.request(2, 3, 4);

    let mut out = [0u8; 32];
    assert_eq!(buffers.hash(&request, &mut out), STATUS_OK);
    assert_eq!(out, hex!("0d640df58d78766c08c037a34a8b53c9d01ef0452d75b65eb52520e96b01e659"));
    Ok(())
}

#[test]
fn test_password_and_key_are_wiped() -> Result<()> {
    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    buffers.key = b"pepper".to_vec();
    let request = buffers.request(1, 1, 1);

    let mut out = [0u8; 32];
    assert_eq!(buffers.hash(&request, &mut out), STATUS_OK);
    assert_eq!(buffers.password, [0; 8]);
    assert_eq!(buffers.key, [0; 6]);
    assert_eq!(buffers.salt, b"somesalt");
    assert!(buffers.work_area.iter().all(|block| *block == Block::ZERO));
    Ok(())
}

#[test]
fn test_password_is_wiped_on_failure() -> Result<()> {
    let mut buffers = Buffers::new(b"password", b"short", 32);
    let request = buffers.request(2, 1, 1);

    let mut out = [0xaau8; 32];
    assert_eq!(buffers.hash(&request, &mut out), ParamError::SaltTooShort.code());
    assert_eq!(buffers.password, [0; 8]);
    assert_eq!(out, [0xaa; 32]);
    Ok(())
}

#[test]
fn test_error_codes() -> Result<()> {
    let mut out = [0u8; 32];

    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    let request = buffers.request(3, 1, 1);
    assert_eq!(buffers.hash(&request, &mut out), Error::UnsupportedVariant(3).code());

    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    let request = buffers.request(2, 0, 1);
    assert_eq!(buffers.hash(&request, &mut out), ParamError::TimeTooSmall.code());

    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    let request = buffers.request(2, 1, 8);
    assert_eq!(buffers.hash(&request, &mut out), ParamError::MemoryTooLittle.code());

    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    let request = buffers.request(2, 1, 1);
    assert_eq!(buffers.hash(&request, &mut out[..3]), Error::OutputTooShort.code());

    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    let request = RawRequest { salt: std::ptr::null(), ..buffers.request(2, 1, 1) };
    assert_eq!(buffers.hash(&request, &mut out), ParamError::NullPointer.code());

    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    let request = RawRequest { version: 0x14, ..buffers.request(2, 1, 1) };
    assert_eq!(buffers.hash(&request, &mut out), ParamError::Version(0x14).code());
    Ok(())
}

#[test]
fn test_misaligned_work_area() -> Result<()> {
    let mut buffers = Buffers::new(b"password", b"somesalt", 33);
    let request = RawRequest { nb_blocks: 32, ..buffers.request(2, 1, 1) };
    let work_area = unsafe { buffers.work_area.as_mut_ptr().cast::<u8>().add(4) };

    let mut out = [0u8; 32];
    let status = unsafe { hash_raw(out.as_mut_ptr(), 32, work_area, &request) };
    assert_eq!(status, ParamError::Misaligned.code());
    Ok(())
}

#[test]
fn test_verify_statuses() -> Result<()> {
    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    let request = buffers.request(0, 2, 1);
    let mut tag = [0u8; 32];
    assert_eq!(buffers.hash(&request, &mut tag), STATUS_OK);

    // the password was wiped by the hash call
    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    let request = buffers.request(0, 2, 1);
    assert_eq!(buffers.verify(&request, &tag), STATUS_OK);

    let mut buffers = Buffers::new(b"passw0rd", b"somesalt", 32);
    let request = buffers.request(0, 2, 1);
    assert_eq!(buffers.verify(&request, &tag), Error::VerifyMismatch.code());

    let mut buffers = Buffers::new(b"password", b"somesalt", 32);
    let request = buffers.request(0, 0, 1);
    let status = buffers.verify(&request, &tag);
    assert_ne!(status, STATUS_OK);
    assert_ne!(status, Error::VerifyMismatch.code());
    Ok(())
}

#[test]
fn test_blake2b() -> Result<()> {
    let message = b"a";
    let mut out = [0u8; 64];
    let status = unsafe { blake2b_raw(out.as_mut_ptr(), 64, message.as_ptr(), 1) };
    assert_eq!(status, STATUS_OK);
    assert_eq!(
        out,
        hex!(
            "333fcb4ee1aa7c115355ec66ceac917c8bfd815bf7587d325aec1864edd24e34"
            "d5abe2c6b1b5ee3face62fed78dbef802f2a85cb91d455a8f5249d330853cb3c"
        )
    );

    let status = unsafe { blake2b_raw(out.as_mut_ptr(), 65, message.as_ptr(), 1) };
    assert_eq!(status, Error::OutputTooLong.code());
    let status = unsafe { blake2b_raw(out.as_mut_ptr(), 0, message.as_ptr(), 1) };
    assert_eq!(status, Error::OutputTooShort.code());
    Ok(())
}

#[test]
fn test_compare_and_wipe() -> Result<()> {
    let a = [7u8; 64];
    let mut b = [7u8; 64];
    assert_eq!(unsafe { compare_raw(a.as_ptr(), b.as_ptr(), 64) }, STATUS_OK);

    b[63] = 8;
    assert_eq!(unsafe { compare_raw(a.as_ptr(), b.as_ptr(), 64) }, STATUS_DIFFERENT);
    assert_eq!(unsafe { compare_raw(a.as_ptr(), b.as_ptr(), 32) }, STATUS_OK);

    unsafe { wipe_raw(b.as_mut_ptr(), 64) };
    assert_eq!(b, [0; 64]);
    unsafe { wipe_raw(std::ptr::null_mut(), 0) };
    Ok(())
}
