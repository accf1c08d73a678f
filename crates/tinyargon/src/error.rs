use core::fmt::Display;

/// Status code reported across the guest boundary when an operation succeeds.
pub const STATUS_OK: i32 = 0;

/// Errors that can occur for `tinyargon` operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A cost parameter or input length is out of range
    InvalidParameter(ParamError),

    /// The password is longer than `u32::MAX` bytes
    PasswordTooLong,

    /// The salt is longer than `u32::MAX` bytes
    SaltTooLong,

    /// The requested output is longer than `u32::MAX` bytes (or 64 bytes for plain BLAKE2b)
    OutputTooLong,

    /// The requested output is shorter than 4 bytes (or empty for plain BLAKE2b)
    OutputTooShort,

    /// The variant code is not one of Argon2d (0), Argon2i (1) or Argon2id (2)
    UnsupportedVariant(u32),

    /// The arena could not grow the linear memory to fit an allocation
    AllocationFailure {
        /// The size of the allocation
        size: usize,
        /// The number of pages the memory had when the allocation failed
        pages: usize,
    },

    /// An out-of-bounds access into host linear memory
    MemoryOutOfBounds {
        /// The offset of the access
        offset: usize,
        /// The size of the access
        len: usize,
        /// The size of the memory
        max: usize,
    },

    /// The recomputed tag does not match the expected one
    VerifyMismatch,
}

/// Parameter checks that failed before any memory was touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamError {
    /// The salt is shorter than 8 bytes
    SaltTooShort,

    /// The secret is longer than `u32::MAX` bytes
    SecretTooLong,

    /// The associated data is longer than `u32::MAX` bytes
    AssociatedDataTooLong,

    /// The time cost is zero
    TimeTooSmall,

    /// Fewer than `8 * lanes` KiB of memory were requested
    MemoryTooLittle,

    /// More memory was requested than the target can address
    MemoryTooMuch,

    /// Zero lanes were requested
    LanesTooFew,

    /// More than `0xFFFFFF` lanes were requested
    LanesTooMany,

    /// Zero threads were requested
    ThreadsTooFew,

    /// More than `0xFFFFFF` threads were requested
    ThreadsTooMany,

    /// The version is neither `0x10` nor `0x13`
    Version(u32),

    /// The work area holds fewer blocks than the aligned memory size
    WorkAreaTooSmall {
        /// Blocks needed
        required: usize,
        /// Blocks provided
        provided: usize,
    },

    /// A non-empty buffer was passed as a null pointer
    NullPointer,

    /// A work area pointer is not aligned to 8 bytes
    Misaligned,
}

impl ParamError {
    /// Get the message of the parameter error
    pub fn message(&self) -> &'static str {
        match self {
            Self::SaltTooShort => "salt is too short",
            Self::SecretTooLong => "secret is too long",
            Self::AssociatedDataTooLong => "associated data is too long",
            Self::TimeTooSmall => "time cost is too small",
            Self::MemoryTooLittle => "memory cost is too small",
            Self::MemoryTooMuch => "memory cost is too large",
            Self::LanesTooFew => "too few lanes",
            Self::LanesTooMany => "too many lanes",
            Self::ThreadsTooFew => "not enough threads",
            Self::ThreadsTooMany => "too many threads",
            Self::Version(_) => "invalid version",
            Self::WorkAreaTooSmall { .. } => "work area is too small",
            Self::NullPointer => "null pointer for a non-empty buffer",
            Self::Misaligned => "misaligned work area",
        }
    }

    /// The status code of the reference implementation for this error
    pub fn code(&self) -> i32 {
        match self {
            Self::SaltTooShort => -6,
            Self::AssociatedDataTooLong => -9,
            Self::SecretTooLong => -11,
            Self::TimeTooSmall => -12,
            Self::MemoryTooLittle => -14,
            Self::MemoryTooMuch => -15,
            Self::LanesTooFew => -16,
            Self::LanesTooMany => -17,
            Self::ThreadsTooFew => -28,
            Self::ThreadsTooMany => -29,
            Self::WorkAreaTooSmall { .. } | Self::NullPointer | Self::Misaligned | Self::Version(_) => -25,
        }
    }
}

impl Error {
    /// Get the message of the error
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidParameter(err) => err.message(),
            Self::PasswordTooLong => "password is too long",
            Self::SaltTooLong => "salt is too long",
            Self::OutputTooLong => "output is too long",
            Self::OutputTooShort => "output is too short",
            Self::UnsupportedVariant(_) => "unsupported variant",
            Self::AllocationFailure { .. } => "memory allocation failed",
            Self::MemoryOutOfBounds { .. } => "out of bounds memory access",
            Self::VerifyMismatch => "the password does not match the supplied hash",
        }
    }

    /// The negative status code reported across the guest boundary.
    ///
    /// Codes follow the reference implementation's `Argon2_ErrorCodes`, so hosts
    /// that already understand those can decode ours.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidParameter(err) => err.code(),
            Self::OutputTooShort => -2,
            Self::OutputTooLong => -3,
            Self::PasswordTooLong => -5,
            Self::SaltTooLong => -7,
            Self::AllocationFailure { .. } => -22,
            Self::MemoryOutOfBounds { .. } => -25,
            Self::UnsupportedVariant(_) => -26,
            Self::VerifyMismatch => -35,
        }
    }
}

impl Display for ParamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Version(version) => write!(f, "invalid version: {version:#x}"),
            Self::WorkAreaTooSmall { required, provided } => {
                write!(f, "work area is too small: {provided} blocks provided, {required} required")
            }
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidParameter(err) => write!(f, "invalid parameter: {err}"),
            Self::UnsupportedVariant(code) => write!(f, "unsupported variant: {code}"),
            Self::AllocationFailure { size, pages } => {
                write!(f, "memory allocation failed: {size} bytes with {pages} pages committed")
            }
            Self::MemoryOutOfBounds { offset, len, max } => {
                write!(f, "out of bounds memory access: offset={offset}, len={len}, max={max}")
            }
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl core::error::Error for ParamError {}
impl core::error::Error for Error {}

impl From<ParamError> for Error {
    fn from(value: ParamError) -> Self {
        Self::InvalidParameter(value)
    }
}

/// A wrapper around [`core::result::Result`] for tinyargon operations
pub type Result<T, E = Error> = crate::std::result::Result<T, E>;
