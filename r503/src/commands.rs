//! The fixed catalogue of device operations
//!
//! Each operation is a thin mapping from semantic arguments to an
//! instruction code, payload layout and response layout, executed through
//! [`Session::transact`]. Confirmation codes come back as values for the
//! caller to inspect; only transport-tier faults are `Err`.

use bytes::{Buf, Bytes};

use r503_core::{constants, ConfirmationCode, Instruction};
use r503_types::{IndexTable, ProductInfo, SearchHit, SystemParameters};

use crate::error::Result;
use crate::session::{Outcome, Session};

impl Session {
    // Diagnostics

    /// Handshake with the module; success means the sensor is responsive
    pub fn handshake(&mut self) -> Result<ConfirmationCode> {
        Ok(self.transact(Instruction::HandShake, &[])?.code)
    }

    /// Check whether the sensor hardware is normal
    pub fn check_sensor(&mut self) -> Result<ConfirmationCode> {
        Ok(self.transact(Instruction::CheckSensor, &[])?.code)
    }

    /// Cancel the instruction currently executing on the module
    pub fn cancel(&mut self) -> Result<ConfirmationCode> {
        Ok(self.transact(Instruction::Cancel, &[])?.code)
    }

    /// Soft-reset the module
    pub fn soft_reset(&mut self) -> Result<ConfirmationCode> {
        Ok(self.transact(Instruction::SoftRst, &[])?.code)
    }

    /// Configure the aura LED ring.
    ///
    /// `ctrl`: 1 breathing, 2 flashing, 3 on, 4 off, 5 fade on, 6 fade off;
    /// `color`: 0-7; `speed` and `cycles`: 0-255.
    pub fn aura_led_config(
        &mut self,
        ctrl: u8,
        speed: u8,
        color: u8,
        cycles: u8,
    ) -> Result<ConfirmationCode> {
        Ok(self
            .transact(Instruction::AuraLedConfig, &[ctrl, speed, color, cycles])?
            .code)
    }

    /// Read system status and basic configuration
    pub fn read_sys_para(&mut self) -> Result<Outcome<SystemParameters>> {
        let rsp = self.transact(Instruction::ReadSysPara, &[])?;
        if !rsp.code.is_success() {
            return Ok(Outcome::failure(rsp.code));
        }

        let params = SystemParameters::parse(&rsp.payload)?;
        Ok(Outcome::new(rsp.code, params))
    }

    /// Read the fixed-width product information block
    pub fn read_prod_info(&mut self) -> Result<Outcome<ProductInfo>> {
        let rsp = self.transact(Instruction::ReadProdInfo, &[])?;
        if !rsp.code.is_success() {
            return Ok(Outcome::failure(rsp.code));
        }

        let info = ProductInfo::parse(&rsp.payload)?;
        Ok(Outcome::new(rsp.code, info))
    }

    /// Read the firmware version blob
    pub fn get_fw_ver(&mut self) -> Result<Outcome<Bytes>> {
        let rsp = self.transact(Instruction::GetFwVer, &[])?;
        if !rsp.code.is_success() {
            return Ok(Outcome::failure(rsp.code));
        }
        Ok(Outcome::new(rsp.code, rsp.payload))
    }

    /// Read the algorithm version blob
    pub fn get_alg_ver(&mut self) -> Result<Outcome<Bytes>> {
        let rsp = self.transact(Instruction::GetAlgVer, &[])?;
        if !rsp.code.is_success() {
            return Ok(Outcome::failure(rsp.code));
        }
        Ok(Outcome::new(rsp.code, rsp.payload))
    }

    /// Have the module generate a 32-bit random number
    pub fn get_random_code(&mut self) -> Result<Outcome<u32>> {
        let rsp = self.transact(Instruction::GetRandomCode, &[])?;
        if !rsp.code.is_success() || rsp.payload.len() < 4 {
            return Ok(Outcome::failure(rsp.code));
        }

        let mut payload = rsp.payload;
        Ok(Outcome::new(rsp.code, payload.get_u32()))
    }

    // Image / character pipeline

    /// Capture a finger image into the image buffer
    pub fn get_img(&mut self) -> Result<ConfirmationCode> {
        Ok(self.transact(Instruction::GenImg, &[])?.code)
    }

    /// Capture a finger image, reporting `ImageWeak` on poor quality
    pub fn get_image_ex(&mut self) -> Result<ConfirmationCode> {
        Ok(self.transact(Instruction::GetImageEx, &[])?.code)
    }

    /// Generate a character file from the image buffer into character
    /// buffer 1 or 2
    pub fn img2tz(&mut self, buffer_id: u8) -> Result<ConfirmationCode> {
        Ok(self.transact(Instruction::Img2Tz, &[buffer_id])?.code)
    }

    /// Combine both character buffers into a storable model
    pub fn reg_model(&mut self) -> Result<ConfirmationCode> {
        Ok(self.transact(Instruction::RegModel, &[])?.code)
    }

    /// Store the model in a character buffer at a flash library page
    pub fn store(&mut self, buffer_id: u8, page_id: u16) -> Result<ConfirmationCode> {
        let mut args = vec![buffer_id];
        args.extend_from_slice(&page_id.to_be_bytes());
        Ok(self.transact(Instruction::Store, &args)?.code)
    }

    /// Load a stored template back into a character buffer
    pub fn load_char(&mut self, page_id: u16, buffer_id: u8) -> Result<ConfirmationCode> {
        let mut args = vec![buffer_id];
        args.extend_from_slice(&page_id.to_be_bytes());
        Ok(self.transact(Instruction::LoadChar, &args)?.code)
    }

    // Search / match

    /// Compare the character buffers pairwise; the value is the similarity
    /// score, `NoMatch` the failure code
    pub fn match_templates(&mut self) -> Result<Outcome<u16>> {
        let rsp = self.transact(Instruction::Match, &[])?;
        if !rsp.code.is_success() || rsp.payload.len() < 2 {
            return Ok(Outcome::failure(rsp.code));
        }

        let mut payload = rsp.payload;
        Ok(Outcome::new(rsp.code, payload.get_u16()))
    }

    /// Search the library for the character buffer's best match within
    /// `count` pages starting at `start`. `NotFound` carries no hit.
    pub fn search(&mut self, buffer_id: u8, start: u16, count: u16) -> Result<Outcome<SearchHit>> {
        let mut args = vec![buffer_id];
        args.extend_from_slice(&start.to_be_bytes());
        args.extend_from_slice(&count.to_be_bytes());

        let rsp = self.transact(Instruction::Search, &args)?;
        if !rsp.code.is_success() {
            return Ok(Outcome::failure(rsp.code));
        }

        let hit = SearchHit::parse(&rsp.payload)?;
        Ok(Outcome::new(rsp.code, hit))
    }

    // Library management

    /// Delete `count` consecutive templates starting at `page_id`
    pub fn delete_char(&mut self, page_id: u16, count: u16) -> Result<ConfirmationCode> {
        let mut args = Vec::with_capacity(4);
        args.extend_from_slice(&page_id.to_be_bytes());
        args.extend_from_slice(&count.to_be_bytes());
        Ok(self.transact(Instruction::DeletChar, &args)?.code)
    }

    /// Empty the whole flash library
    pub fn empty_finger_lib(&mut self) -> Result<ConfirmationCode> {
        Ok(self.transact(Instruction::Empty, &[])?.code)
    }

    /// Number of valid templates currently stored
    pub fn read_valid_template_num(&mut self) -> Result<Outcome<u16>> {
        let rsp = self.transact(Instruction::TemplateNum, &[])?;
        if !rsp.code.is_success() || rsp.payload.len() < 2 {
            return Ok(Outcome::failure(rsp.code));
        }

        let mut payload = rsp.payload;
        Ok(Outcome::new(rsp.code, payload.get_u16()))
    }

    /// Read one page (0-3) of the template occupancy index table
    pub fn read_index_table(&mut self, index_page: u8) -> Result<Outcome<IndexTable>> {
        if index_page >= constants::INDEX_PAGE_COUNT {
            return Ok(Outcome::failure(ConfirmationCode::InvalidParameter));
        }

        let rsp = self.transact(Instruction::ReadIndexTable, &[index_page])?;
        if !rsp.code.is_success() {
            return Ok(Outcome::failure(rsp.code));
        }

        let table = IndexTable::parse(index_page, &rsp.payload)?;
        Ok(Outcome::new(rsp.code, table))
    }

    /// Smallest free library slot, or `None` when all 200 are taken.
    /// Index page 0 covers the whole library.
    pub fn get_available_location(&mut self) -> Result<Outcome<Option<u16>>> {
        let table = self.read_index_table(0)?;
        match table.value {
            Some(table) => Ok(Outcome::new(
                ConfirmationCode::Success,
                table.first_free(constants::LIBRARY_CAPACITY),
            )),
            None => Ok(Outcome::failure(table.code)),
        }
    }

    // Notepad

    /// Write up to 32 bytes to a notepad flash page (0-15). Bounds are
    /// checked locally; content is zero-padded to the full page.
    pub fn write_notepad(&mut self, page: u8, content: &[u8]) -> Result<ConfirmationCode> {
        if page >= constants::NOTEPAD_PAGE_COUNT || content.len() > constants::NOTEPAD_PAGE_SIZE {
            return Ok(ConfirmationCode::InvalidContent);
        }

        let mut args = vec![0u8; 1 + constants::NOTEPAD_PAGE_SIZE];
        args[0] = page;
        args[1..1 + content.len()].copy_from_slice(content);

        Ok(self.transact(Instruction::WriteNotepad, &args)?.code)
    }

    /// Read a notepad flash page back as raw bytes
    pub fn read_notepad(&mut self, page: u8) -> Result<Outcome<Bytes>> {
        if page >= constants::NOTEPAD_PAGE_COUNT {
            return Ok(Outcome::failure(ConfirmationCode::InvalidContent));
        }

        let rsp = self.transact(Instruction::ReadNotepad, &[page])?;
        if !rsp.code.is_success() {
            return Ok(Outcome::failure(rsp.code));
        }
        Ok(Outcome::new(rsp.code, rsp.payload))
    }
}
