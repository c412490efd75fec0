//! R503 instruction code definitions
//!
//! Names follow the GROW R503 user manual.

use std::fmt;

/// Instruction codes carried in the first payload byte of a command frame
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Instruction {
    // Image / character pipeline
    GenImg = 0x01,
    Img2Tz = 0x02,
    Match = 0x03,
    Search = 0x04,
    RegModel = 0x05,
    Store = 0x06,
    LoadChar = 0x07,

    // Bulk transfers
    UpChar = 0x08,
    DownChar = 0x09,
    UpImage = 0x0A,
    DownImage = 0x0B,

    // Library management
    DeletChar = 0x0C,
    Empty = 0x0D,

    // Configuration
    SetSysPara = 0x0E,
    ReadSysPara = 0x0F,
    SetPwd = 0x12,
    VfyPwd = 0x13,
    GetRandomCode = 0x14,
    SetAddr = 0x15,
    ReadInfPage = 0x16,

    // Notepad
    WriteNotepad = 0x18,
    ReadNotepad = 0x19,

    // Library status
    TemplateNum = 0x1D,
    ReadIndexTable = 0x1F,

    // Capture / control
    GetImageEx = 0x28,
    Cancel = 0x30,
    AutoEnroll = 0x31,
    AutoIdentify = 0x32,
    AuraLedConfig = 0x35,
    CheckSensor = 0x36,

    // Diagnostics
    GetAlgVer = 0x39,
    GetFwVer = 0x3A,
    ReadProdInfo = 0x3C,
    SoftRst = 0x3D,
    HandShake = 0x40,
}

impl Instruction {
    /// Get the manual's name for this instruction
    pub fn name(self) -> &'static str {
        match self {
            Self::GenImg => "GenImg",
            Self::Img2Tz => "Img2Tz",
            Self::Match => "Match",
            Self::Search => "Search",
            Self::RegModel => "RegModel",
            Self::Store => "Store",
            Self::LoadChar => "LoadChar",
            Self::UpChar => "UpChar",
            Self::DownChar => "DownChar",
            Self::UpImage => "UpImage",
            Self::DownImage => "DownImage",
            Self::DeletChar => "DeletChar",
            Self::Empty => "Empty",
            Self::SetSysPara => "SetSysPara",
            Self::ReadSysPara => "ReadSysPara",
            Self::SetPwd => "SetPwd",
            Self::VfyPwd => "VfyPwd",
            Self::GetRandomCode => "GetRandomCode",
            Self::SetAddr => "SetAddr",
            Self::ReadInfPage => "ReadInfPage",
            Self::WriteNotepad => "WriteNotepad",
            Self::ReadNotepad => "ReadNotepad",
            Self::TemplateNum => "TemplateNum",
            Self::ReadIndexTable => "ReadIndexTable",
            Self::GetImageEx => "GetImageEx",
            Self::Cancel => "Cancel",
            Self::AutoEnroll => "AutoEnroll",
            Self::AutoIdentify => "AutoIdentify",
            Self::AuraLedConfig => "AuraLedConfig",
            Self::CheckSensor => "CheckSensor",
            Self::GetAlgVer => "GetAlgVer",
            Self::GetFwVer => "GetFwVer",
            Self::ReadProdInfo => "ReadProdInfo",
            Self::SoftRst => "SoftRst",
            Self::HandShake => "HandShake",
        }
    }
}

impl From<Instruction> for u8 {
    fn from(instruction: Instruction) -> u8 {
        instruction as u8
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}
