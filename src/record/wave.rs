//! Wave data records (series tag 0x30): a wave-statistics block followed by
//! up to five independently flagged sub-blocks.
use serde::{Deserialize, Serialize};

use crate::bits::BitField;
use crate::bytes::Cursor;
use crate::header::RecordHeader;
use crate::timecode::DateTime;
use crate::Result;

/// Flags naming which optional sub-blocks a wave record carries.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WaveContent {
    pub has_direction_spectra: bool,
    pub has_fourier_spectra: bool,
    pub has_wave_band: bool,
    pub has_energy_spectra: bool,
    pub has_wave_parameters: bool,
}

impl WaveContent {
    fn decode(cursor: &mut Cursor) -> Result<Self> {
        let mut bf = BitField::new(cursor.take(2)?);
        bf.skip_bits(11)?;
        Ok(WaveContent {
            has_direction_spectra: bf.take_bit()?,
            has_fourier_spectra: bf.take_bit()?,
            has_wave_band: bf.take_bit()?,
            has_energy_spectra: bf.take_bit()?,
            has_wave_parameters: bf.take_bit()?,
        })
    }
}

/// Wave processing error word.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WaveError {
    /// The raw 32-bit word.
    pub value: u32,
    pub no_pressure: bool,
    pub low_pressure: bool,
    pub low_amp: bool,
    pub white_noise: bool,
    pub unreasonable_estimation: bool,
    pub never_processed: bool,
    pub ast_out_of_bound: bool,
    pub direction_ambiguity: bool,
    pub no_pressure_peak: bool,
    pub close_to_clip: bool,
    pub ast_height_loss: bool,
    pub high_tilt: bool,
    pub correlation: bool,
}

impl WaveError {
    fn decode(cursor: &mut Cursor) -> Result<Self> {
        let span = cursor.take(4)?;
        let mut bf = BitField::new(span);
        bf.skip_bits(16)?;
        let no_pressure_peak = bf.take_bit()?;
        let close_to_clip = bf.take_bit()?;
        let ast_height_loss = bf.take_bit()?;
        let high_tilt = bf.take_bit()?;
        let correlation = bf.take_bit()?;
        bf.skip_bits(3)?;
        Ok(WaveError {
            value: u32::from_le_bytes([span[0], span[1], span[2], span[3]]),
            no_pressure: bf.take_bit()?,
            low_pressure: bf.take_bit()?,
            low_amp: bf.take_bit()?,
            white_noise: bf.take_bit()?,
            unreasonable_estimation: bf.take_bit()?,
            never_processed: bf.take_bit()?,
            ast_out_of_bound: bf.take_bit()?,
            direction_ambiguity: bf.take_bit()?,
            no_pressure_peak,
            close_to_clip,
            ast_height_loss,
            high_tilt,
            correlation,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WaveStatus {
    /// The raw 32-bit word.
    pub value: u32,
    pub active_configuration: bool,
}

impl WaveStatus {
    fn decode(cursor: &mut Cursor) -> Result<Self> {
        let span = cursor.take(4)?;
        let mut bf = BitField::new(span);
        bf.skip_bits(8)?;
        let active_configuration = bf.take_bit()?;
        Ok(WaveStatus {
            value: u32::from_le_bytes([span[0], span[1], span[2], span[3]]),
            active_configuration,
        })
    }
}

/// Bulk wave statistics, all heights in m, periods in s, directions in
/// degrees.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct WaveParameters {
    pub height0: f32,
    pub height3: f32,
    pub height10: f32,
    pub height_max: f32,
    pub height_mean: f32,
    pub period_mean: f32,
    pub period_peak: f32,
    pub period_z: f32,
    pub period_1_3: f32,
    pub period_1_10: f32,
    pub period_max: f32,
    pub period_energy: f32,
    pub direction_at_peak_period: f32,
    pub spreading_at_peak_period: f32,
    pub wave_direction_mean: f32,
    pub unidirectivity_index: f32,
    pub pressure_mean: f32,
    pub current_speed_mean: f32,
    pub current_direction_mean: f32,
    pub ast_mean_distance: f32,
}

impl WaveParameters {
    /// Trailing reserved bytes after the statistics.
    const RESERVED: usize = 20;

    fn decode(cursor: &mut Cursor) -> Result<Self> {
        let p = WaveParameters {
            height0: cursor.read_f32()?,
            height3: cursor.read_f32()?,
            height10: cursor.read_f32()?,
            height_max: cursor.read_f32()?,
            height_mean: cursor.read_f32()?,
            period_mean: cursor.read_f32()?,
            period_peak: cursor.read_f32()?,
            period_z: cursor.read_f32()?,
            period_1_3: cursor.read_f32()?,
            period_1_10: cursor.read_f32()?,
            period_max: cursor.read_f32()?,
            period_energy: cursor.read_f32()?,
            direction_at_peak_period: cursor.read_f32()?,
            spreading_at_peak_period: cursor.read_f32()?,
            wave_direction_mean: cursor.read_f32()?,
            unidirectivity_index: cursor.read_f32()?,
            pressure_mean: cursor.read_f32()?,
            current_speed_mean: cursor.read_f32()?,
            current_direction_mean: cursor.read_f32()?,
            ast_mean_distance: cursor.read_f32()?,
        };
        cursor.take(Self::RESERVED)?;
        Ok(p)
    }
}

/// One frequency band (swell or sea) of band statistics.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct WaveBand {
    /// Hz
    pub low_frequency: f32,
    /// Hz
    pub high_frequency: f32,
    pub height0: f32,
    pub period_mean: f32,
    pub period_peak: f32,
    pub direction_at_peak_period: f32,
    pub wave_direction_mean: f32,
    pub spreading_at_peak_period: f32,
}

impl WaveBand {
    const RESERVED: usize = 20;

    fn decode(cursor: &mut Cursor) -> Result<Self> {
        let b = WaveBand {
            low_frequency: cursor.read_f32()?,
            high_frequency: cursor.read_f32()?,
            height0: cursor.read_f32()?,
            period_mean: cursor.read_f32()?,
            period_peak: cursor.read_f32()?,
            direction_at_peak_period: cursor.read_f32()?,
            wave_direction_mean: cursor.read_f32()?,
            spreading_at_peak_period: cursor.read_f32()?,
        };
        cursor.take(Self::RESERVED)?;
        Ok(b)
    }
}

/// A frequency-axis spectrum block. The number of values per bin differs by
/// block: one for the energy spectrum, four (A1, B1, A2, B2) for the
/// Fourier coefficients, two (mean direction, spread) for the directional
/// spectrum.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct WaveSpectrum {
    /// Hz
    pub low_frequency: f32,
    /// Hz
    pub high_frequency: f32,
    /// Hz
    pub step_frequency: f32,
    pub number_of_bins: u16,
    /// `values_per_bin * number_of_bins` values, sliced per component.
    pub data: Vec<f32>,
}

impl WaveSpectrum {
    const RESERVED: usize = 22;

    fn decode(cursor: &mut Cursor, values_per_bin: usize) -> Result<Self> {
        let low_frequency = cursor.read_f32()?;
        let high_frequency = cursor.read_f32()?;
        let step_frequency = cursor.read_f32()?;
        let number_of_bins = cursor.read_u16()?;
        cursor.take(Self::RESERVED)?;
        let n = values_per_bin * usize::from(number_of_bins);
        let mut data = Vec::with_capacity(n);
        for _ in 0..n {
            data.push(cursor.read_f32()?);
        }
        Ok(WaveSpectrum {
            low_frequency,
            high_frequency,
            step_frequency,
            number_of_bins,
            data,
        })
    }

    /// The `i`-th of the block's equally sized component slices, or `None`
    /// when the block does not hold that many components.
    #[must_use]
    pub fn component(&self, i: usize) -> Option<&[f32]> {
        let n = usize::from(self.number_of_bins);
        self.data.get(i * n..(i + 1) * n)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WaveData {
    pub header: RecordHeader,
    pub version: u8,
    pub offset_of_data: u8,
    pub content: WaveContent,
    pub serial_number: u32,
    pub datetime: DateTime,
    pub wave_counter: u16,
    pub error: WaveError,
    pub status: WaveStatus,
    pub spectrum_type: u8,
    pub processing_method: u8,
    pub target_cell: u8,
    pub number_of_no_detects: u16,
    pub number_of_bad_detects: u16,
    /// Hz
    pub cut_off_frequency: f32,
    /// s
    pub processing_time: f32,
    pub number_of_zero_crossings: u16,
    pub version_string: String,
    pub parameters: Option<WaveParameters>,
    pub swell: Option<WaveBand>,
    pub sea: Option<WaveBand>,
    pub energy_spectrum: Option<WaveSpectrum>,
    pub fourier_coefficients: Option<WaveSpectrum>,
    pub direction_spectrum: Option<WaveSpectrum>,
}

impl WaveData {
    pub fn decode(cursor: &mut Cursor, header: &RecordHeader) -> Result<Self> {
        let data_start = header.data_start;
        let version = cursor.read_u8()?;
        let offset_of_data = cursor.read_u8()?;
        let content = WaveContent::decode(cursor)?;
        let serial_number = cursor.read_u32()?;
        let datetime = DateTime::decode(cursor)?;
        let wave_counter = cursor.read_u16()?;
        let error = WaveError::decode(cursor)?;
        let status = WaveStatus::decode(cursor)?;
        let spectrum_type = cursor.read_u8()?;
        let processing_method = cursor.read_u8()?;
        let target_cell = cursor.read_u8()?;
        cursor.take(1)?;
        let number_of_no_detects = cursor.read_u16()?;
        let number_of_bad_detects = cursor.read_u16()?;
        let cut_off_frequency = cursor.read_f32()?;
        let processing_time = cursor.read_f32()?;
        let number_of_zero_crossings = cursor.read_u16()?;
        let version_string = String::from_utf8_lossy(cursor.take(4)?).into_owned();

        cursor.seek_to(data_start + offset_of_data as usize)?;
        let parameters = if content.has_wave_parameters {
            Some(WaveParameters::decode(cursor)?)
        } else {
            None
        };
        // One flag gates both bands.
        let (swell, sea) = if content.has_wave_band {
            (Some(WaveBand::decode(cursor)?), Some(WaveBand::decode(cursor)?))
        } else {
            (None, None)
        };
        let energy_spectrum = if content.has_energy_spectra {
            Some(WaveSpectrum::decode(cursor, 1)?)
        } else {
            None
        };
        let fourier_coefficients = if content.has_fourier_spectra {
            Some(WaveSpectrum::decode(cursor, 4)?)
        } else {
            None
        };
        let direction_spectrum = if content.has_direction_spectra {
            Some(WaveSpectrum::decode(cursor, 2)?)
        } else {
            None
        };

        Ok(WaveData {
            header: *header,
            version,
            offset_of_data,
            content,
            serial_number,
            wave_counter,
            datetime,
            error,
            status,
            spectrum_type,
            processing_method,
            target_cell,
            number_of_no_detects,
            number_of_bad_detects,
            cut_off_frequency,
            processing_time,
            number_of_zero_crossings,
            version_string,
            parameters,
            swell,
            sea,
            energy_spectrum,
            fourier_coefficients,
            direction_spectrum,
        })
    }

    #[must_use]
    pub fn spectrum_type_label(&self) -> &'static str {
        match self.spectrum_type {
            0 => "Pressure",
            1 => "Velocity",
            2 => "Auto depth",
            3 => "AST only",
            _ => "unknown",
        }
    }

    #[must_use]
    pub fn processing_method_label(&self) -> &'static str {
        match self.processing_method {
            2 => "SUV",
            4 => "MLMST",
            _ => "unknown",
        }
    }
}
