use core::fmt::Display;

use crate::{Error, ParamError, Result};

/// Number of synchronization points (slices) per pass
pub const SYNC_POINTS: u32 = 4;

/// Minimum number of lanes (degree of parallelism)
pub const MIN_LANES: u32 = 1;
/// Maximum number of lanes
pub const MAX_LANES: u32 = 0x00FF_FFFF;

/// Minimum number of threads
pub const MIN_THREADS: u32 = 1;
/// Maximum number of threads
pub const MAX_THREADS: u32 = 0x00FF_FFFF;

/// Minimum tag length in bytes
pub const MIN_OUTLEN: usize = 4;
/// Maximum tag length in bytes
pub const MAX_OUTLEN: usize = u32::MAX as usize;

/// Minimum number of passes
pub const MIN_TIME: u32 = 1;

/// Minimum memory cost per lane, in KiB blocks
pub const MIN_MEMORY_PER_LANE: u32 = 2 * SYNC_POINTS;

/// Maximum memory cost in KiB blocks; limited by the address space on 32-bit targets
pub const MAX_MEMORY: u32 = {
    let max = 1u64 << (usize::BITS - 11);
    if max > u32::MAX as u64 { u32::MAX } else { max as u32 }
};

/// Input length limits, in bytes
pub const MAX_PWD_LENGTH: usize = u32::MAX as usize;
pub const MIN_SALT_LENGTH: usize = 8;
pub const MAX_SALT_LENGTH: usize = u32::MAX as usize;
pub const MAX_SECRET_LENGTH: usize = u32::MAX as usize;
pub const MAX_AD_LENGTH: usize = u32::MAX as usize;

/// The Argon2 variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(u32)]
pub enum Variant {
    /// Data-dependent addressing
    Argon2d = 0,
    /// Data-independent addressing
    Argon2i = 1,
    /// Data-independent addressing for the first half of the first pass, data-dependent afterwards
    #[default]
    Argon2id = 2,
}

impl Variant {
    /// The lower-case name used in encoded hashes
    pub fn name(&self) -> &'static str {
        match self {
            Self::Argon2d => "argon2d",
            Self::Argon2i => "argon2i",
            Self::Argon2id => "argon2id",
        }
    }
}

impl TryFrom<u32> for Variant {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::Argon2d),
            1 => Ok(Self::Argon2i),
            2 => Ok(Self::Argon2id),
            _ => Err(Error::UnsupportedVariant(value)),
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The Argon2 version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(u32)]
pub enum Version {
    /// Version 1.0, which overwrites blocks on every pass
    V0x10 = 0x10,
    /// Version 1.3, which XORs into blocks after the first pass
    #[default]
    V0x13 = 0x13,
}

impl TryFrom<u32> for Version {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0x10 => Ok(Self::V0x10),
            0x13 => Ok(Self::V0x13),
            _ => Err(ParamError::Version(value).into()),
        }
    }
}

/// Everything needed for one hash computation.
///
/// Inputs are borrowed; the engine never copies the password or the secret
/// outside of the pre-hash state. Defaults follow the host library:
/// Argon2id, version `0x13`, 3 passes, 64 MiB, one lane and a 32 byte tag.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HashRequest<'a> {
    /// Argon2 variant
    pub variant: Variant,
    /// Argon2 version
    pub version: Version,
    /// Number of passes over memory
    pub time_cost: u32,
    /// Memory size in KiB
    pub memory_cost: u32,
    /// Degree of parallelism
    pub lanes: u32,
    /// Maximum number of threads used to fill lanes
    pub threads: u32,
    /// The password
    pub password: &'a [u8],
    /// The salt, at least 8 bytes
    pub salt: &'a [u8],
    /// Optional key mixed into H0
    pub secret: Option<&'a [u8]>,
    /// Optional associated data mixed into H0
    pub associated_data: Option<&'a [u8]>,
    /// Length of the tag in bytes
    pub output_len: usize,
}

impl core::fmt::Debug for HashRequest<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashRequest")
            .field("variant", &self.variant)
            .field("version", &self.version)
            .field("time_cost", &self.time_cost)
            .field("memory_cost", &self.memory_cost)
            .field("lanes", &self.lanes)
            .field("threads", &self.threads)
            .field("password_len", &self.password.len())
            .field("salt", &self.salt)
            .field("secret_len", &self.secret.map(<[u8]>::len))
            .field("associated_data", &self.associated_data)
            .field("output_len", &self.output_len)
            .finish()
    }
}

impl<'a> HashRequest<'a> {
    /// Default number of passes
    pub const DEFAULT_TIME_COST: u32 = 3;
    /// Default memory size in KiB (64 MiB)
    pub const DEFAULT_MEMORY_COST: u32 = 1 << 16;
    /// Default degree of parallelism
    pub const DEFAULT_LANES: u32 = 1;
    /// Default tag length
    pub const DEFAULT_OUTPUT_LEN: usize = 32;

    /// A request with the default cost parameters
    pub fn new(password: &'a [u8], salt: &'a [u8]) -> Self {
        Self {
            variant: Variant::default(),
            version: Version::default(),
            time_cost: Self::DEFAULT_TIME_COST,
            memory_cost: Self::DEFAULT_MEMORY_COST,
            lanes: Self::DEFAULT_LANES,
            threads: Self::DEFAULT_LANES,
            password,
            salt,
            secret: None,
            associated_data: None,
            output_len: Self::DEFAULT_OUTPUT_LEN,
        }
    }

    /// Set the variant
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the version
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Set the number of passes
    pub fn with_time_cost(mut self, time_cost: u32) -> Self {
        self.time_cost = time_cost;
        self
    }

    /// Set the memory size in KiB
    pub fn with_memory_cost(mut self, memory_cost: u32) -> Self {
        self.memory_cost = memory_cost;
        self
    }

    /// Set the number of lanes; the thread count follows unless set afterwards
    pub fn with_lanes(mut self, lanes: u32) -> Self {
        self.lanes = lanes;
        self.threads = lanes;
        self
    }

    /// Set the maximum number of threads
    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    /// Set the secret key
    pub fn with_secret(mut self, secret: &'a [u8]) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Set the associated data
    pub fn with_associated_data(mut self, associated_data: &'a [u8]) -> Self {
        self.associated_data = Some(associated_data);
        self
    }

    /// Set the tag length
    pub fn with_output_len(mut self, output_len: usize) -> Self {
        self.output_len = output_len;
        self
    }

    /// Check every parameter before any memory is touched.
    ///
    /// Checks run in the reference order: input lengths and the tag length
    /// first, then the salt minimum, lanes, passes, memory, threads and
    /// finally the optional inputs.
    pub fn validate(&self) -> Result<()> {
        if self.password.len() > MAX_PWD_LENGTH {
            return Err(Error::PasswordTooLong);
        }
        if self.salt.len() > MAX_SALT_LENGTH {
            return Err(Error::SaltTooLong);
        }
        if self.output_len > MAX_OUTLEN {
            return Err(Error::OutputTooLong);
        }
        if self.output_len < MIN_OUTLEN {
            return Err(Error::OutputTooShort);
        }
        if self.salt.len() < MIN_SALT_LENGTH {
            return Err(ParamError::SaltTooShort.into());
        }

        if self.lanes < MIN_LANES {
            return Err(ParamError::LanesTooFew.into());
        }
        if self.lanes > MAX_LANES {
            return Err(ParamError::LanesTooMany.into());
        }
        if self.time_cost < MIN_TIME {
            return Err(ParamError::TimeTooSmall.into());
        }
        if self.memory_cost < MIN_MEMORY_PER_LANE * self.lanes {
            return Err(ParamError::MemoryTooLittle.into());
        }
        if self.memory_cost > MAX_MEMORY {
            return Err(ParamError::MemoryTooMuch.into());
        }
        if self.threads < MIN_THREADS {
            return Err(ParamError::ThreadsTooFew.into());
        }
        if self.threads > MAX_THREADS {
            return Err(ParamError::ThreadsTooMany.into());
        }

        if self.secret.is_some_and(|secret| secret.len() > MAX_SECRET_LENGTH) {
            return Err(ParamError::SecretTooLong.into());
        }
        if self.associated_data.is_some_and(|ad| ad.len() > MAX_AD_LENGTH) {
            return Err(ParamError::AssociatedDataTooLong.into());
        }

        Ok(())
    }
}
