//! Confirmation code definitions
//!
//! Every well-formed response carries a one-byte confirmation code; zero
//! means success. Codes 99, 101 and 102 never appear on the wire — they are
//! driver-local statuses for transport failures and rejected arguments,
//! kept numerically distinct from every device code.

use std::fmt;

/// Response status byte
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConfirmationCode {
    /// 0x00: command execution complete
    Success,
    /// 0x01: error when receiving data package
    PacketError,
    /// 0x02: no finger on the sensor
    NoFinger,
    /// 0x03: fail to enroll the finger
    EnrollFailed,
    /// 0x06: over-disorderly fingerprint image
    ImageDisordered,
    /// 0x07: too few character points or over-small image
    ImageWeak,
    /// 0x08: finger does not match
    NoMatch,
    /// 0x09: fail to find the matching finger
    NotFound,
    /// 0x0A: fail to combine the character files
    CombineFailed,
    /// 0x0B: addressing page id is beyond the finger library
    PageOutOfRange,
    /// 0x0C: error reading template from library
    TemplateReadError,
    /// 0x0D: error when uploading template
    TemplateUploadError,
    /// 0x0E: module cannot receive the following data packages
    PacketResponseFailed,
    /// 0x0F: error when uploading image
    ImageUploadError,
    /// 0x10: fail to delete the template
    DeleteFailed,
    /// 0x11: fail to clear finger library
    ClearFailed,
    /// 0x13: wrong password
    WrongPassword,
    /// 0x15: no valid primary image in buffer
    NoValidImage,
    /// 0x18: error when writing flash
    FlashWriteError,
    /// 0x19: no definition error
    NoDefinition,
    /// 0x1A: invalid register number
    InvalidRegister,
    /// 0x1B: incorrect configuration of register
    RegisterConfigError,
    /// 0x1C: wrong notepad page number
    BadNotepadPage,
    /// 0x1D: fail to operate the communication port
    CommPortError,
    /// 0x1F: fingerprint library is full
    LibraryFull,
    /// 0x20: the address code is incorrect
    BadAddress,
    /// 0x21: password must be verified
    PasswordRequired,
    /// 0x22: fingerprint template is empty
    TemplateEmpty,
    /// 0x24: fingerprint library is empty
    LibraryEmpty,
    /// 0x26: timeout
    Timeout,
    /// 0x27: fingerprint already exists
    AlreadyExists,
    /// 0x29: sensor hardware error
    SensorError,
    /// 0xFC: unsupported command
    UnsupportedCommand,
    /// 0xFD: hardware error
    HardwareError,
    /// 0xFE: command execution failure
    ExecutionFailed,

    /// 99, driver-local: no usable response from the module
    NoResponse,
    /// 101, driver-local: content violates a length or page bound
    InvalidContent,
    /// 102, driver-local: argument is not one the module accepts
    InvalidParameter,

    /// System reserved value
    Other(u8),
}

impl ConfirmationCode {
    /// Decode a raw status byte. Reserved values map to `Other`.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Self::Success,
            0x01 => Self::PacketError,
            0x02 => Self::NoFinger,
            0x03 => Self::EnrollFailed,
            0x06 => Self::ImageDisordered,
            0x07 => Self::ImageWeak,
            0x08 => Self::NoMatch,
            0x09 => Self::NotFound,
            0x0A => Self::CombineFailed,
            0x0B => Self::PageOutOfRange,
            0x0C => Self::TemplateReadError,
            0x0D => Self::TemplateUploadError,
            0x0E => Self::PacketResponseFailed,
            0x0F => Self::ImageUploadError,
            0x10 => Self::DeleteFailed,
            0x11 => Self::ClearFailed,
            0x13 => Self::WrongPassword,
            0x15 => Self::NoValidImage,
            0x18 => Self::FlashWriteError,
            0x19 => Self::NoDefinition,
            0x1A => Self::InvalidRegister,
            0x1B => Self::RegisterConfigError,
            0x1C => Self::BadNotepadPage,
            0x1D => Self::CommPortError,
            0x1F => Self::LibraryFull,
            0x20 => Self::BadAddress,
            0x21 => Self::PasswordRequired,
            0x22 => Self::TemplateEmpty,
            0x24 => Self::LibraryEmpty,
            0x26 => Self::Timeout,
            0x27 => Self::AlreadyExists,
            0x29 => Self::SensorError,
            0xFC => Self::UnsupportedCommand,
            0xFD => Self::HardwareError,
            0xFE => Self::ExecutionFailed,
            99 => Self::NoResponse,
            101 => Self::InvalidContent,
            102 => Self::InvalidParameter,
            other => Self::Other(other),
        }
    }

    /// Raw status byte
    pub fn raw(self) -> u8 {
        match self {
            Self::Success => 0x00,
            Self::PacketError => 0x01,
            Self::NoFinger => 0x02,
            Self::EnrollFailed => 0x03,
            Self::ImageDisordered => 0x06,
            Self::ImageWeak => 0x07,
            Self::NoMatch => 0x08,
            Self::NotFound => 0x09,
            Self::CombineFailed => 0x0A,
            Self::PageOutOfRange => 0x0B,
            Self::TemplateReadError => 0x0C,
            Self::TemplateUploadError => 0x0D,
            Self::PacketResponseFailed => 0x0E,
            Self::ImageUploadError => 0x0F,
            Self::DeleteFailed => 0x10,
            Self::ClearFailed => 0x11,
            Self::WrongPassword => 0x13,
            Self::NoValidImage => 0x15,
            Self::FlashWriteError => 0x18,
            Self::NoDefinition => 0x19,
            Self::InvalidRegister => 0x1A,
            Self::RegisterConfigError => 0x1B,
            Self::BadNotepadPage => 0x1C,
            Self::CommPortError => 0x1D,
            Self::LibraryFull => 0x1F,
            Self::BadAddress => 0x20,
            Self::PasswordRequired => 0x21,
            Self::TemplateEmpty => 0x22,
            Self::LibraryEmpty => 0x24,
            Self::Timeout => 0x26,
            Self::AlreadyExists => 0x27,
            Self::SensorError => 0x29,
            Self::UnsupportedCommand => 0xFC,
            Self::HardwareError => 0xFD,
            Self::ExecutionFailed => 0xFE,
            Self::NoResponse => 99,
            Self::InvalidContent => 101,
            Self::InvalidParameter => 102,
            Self::Other(raw) => raw,
        }
    }

    /// True for a successful execution
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Human-readable description, matching the manual's wording
    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "command execution complete",
            Self::PacketError => "error when receiving data package",
            Self::NoFinger => "no finger on the sensor",
            Self::EnrollFailed => "fail to enroll the finger",
            Self::ImageDisordered => {
                "fail to generate character file due to the over-disorderly fingerprint image"
            }
            Self::ImageWeak => {
                "fail to generate character file due to lack of character points or over-small image"
            }
            Self::NoMatch => "finger does not match",
            Self::NotFound => "fail to find the matching finger",
            Self::CombineFailed => "fail to combine the character files",
            Self::PageOutOfRange => "addressing page id is beyond the finger library",
            Self::TemplateReadError => {
                "error when reading template from library or the template is invalid"
            }
            Self::TemplateUploadError => "error when uploading template",
            Self::PacketResponseFailed => "module cannot receive the following data packages",
            Self::ImageUploadError => "error when uploading image",
            Self::DeleteFailed => "fail to delete the template",
            Self::ClearFailed => "fail to clear finger library",
            Self::WrongPassword => "wrong password",
            Self::NoValidImage => "fail to generate the image: no valid primary image",
            Self::FlashWriteError => "error when writing flash",
            Self::NoDefinition => "no definition error",
            Self::InvalidRegister => "invalid register number",
            Self::RegisterConfigError => "incorrect configuration of register",
            Self::BadNotepadPage => "wrong notepad page number",
            Self::CommPortError => "fail to operate the communication port",
            Self::LibraryFull => "fingerprint library is full",
            Self::BadAddress => "the address code is incorrect",
            Self::PasswordRequired => "password must be verified",
            Self::TemplateEmpty => "fingerprint template is empty",
            Self::LibraryEmpty => "fingerprint library is empty",
            Self::Timeout => "timeout",
            Self::AlreadyExists => "fingerprint already exists",
            Self::SensorError => "sensor hardware error",
            Self::UnsupportedCommand => "unsupported command",
            Self::HardwareError => "hardware error",
            Self::ExecutionFailed => "command execution failure",
            Self::NoResponse => "no usable response received from the module",
            Self::InvalidContent => "incorrect page number or content length",
            Self::InvalidParameter => "not an expected argument",
            Self::Other(_) => "system reserved",
        }
    }
}

impl From<u8> for ConfirmationCode {
    fn from(raw: u8) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}h: {}", self.raw(), self.description())
    }
}
