//! Current-profile family bodies: velocity profiles (several series tags
//! share this shape), echosounder profiles, and spectrum profiles.
use serde::{Deserialize, Serialize};

use crate::bits::BitField;
use crate::bytes::Cursor;
use crate::header::RecordHeader;
use crate::record::common::ProfileCommon;
use crate::record::series;
use crate::Result;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordinateSystem {
    Enu,
    Xyz,
    Beam,
    NotUsed,
}

impl CoordinateSystem {
    fn from_value(value: u32) -> Self {
        match value {
            0 => CoordinateSystem::Enu,
            1 => CoordinateSystem::Xyz,
            2 => CoordinateSystem::Beam,
            _ => CoordinateSystem::NotUsed,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CoordinateSystem::Enu => "ENU",
            CoordinateSystem::Xyz => "XYZ",
            CoordinateSystem::Beam => "BEAM",
            CoordinateSystem::NotUsed => "not used",
        }
    }
}

/// Undocumented two-float extension carried at the data offset by the
/// 0x15/0x1a series tags.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct StmExtension {
    pub scattering: f32,
    pub high_range: f32,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Altimeter {
    /// m
    pub distance: f32,
    pub quality: u16,
    pub status: u16,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Ast {
    /// m
    pub distance: f32,
    pub quality: u16,
    pub offset: i16,
    pub pressure: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AltimeterRaw {
    /// m between samples
    pub samples_distance: f64,
    pub samples: Vec<i16>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ahrs {
    pub rotation_matrix: [f32; 9],
    pub quaternion: [f32; 4],
    pub gyro: [f32; 3],
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct StdDeviation {
    /// degrees
    pub pitch: f64,
    /// degrees
    pub roll: f64,
    /// degrees
    pub heading: f64,
    /// dBar
    pub pressure: f64,
}

/// A velocity/current profile record (burst, average, and the altimeter
/// variants of each).
///
/// The variable sections follow the fixed block in a fixed order; each is
/// present, and contributes to the record length, only when its presence
/// flags are set. Velocity and amplitude are additionally gated by the
/// correlation flag; that coupling is carried by the format itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CurrentProfile {
    pub header: RecordHeader,
    pub profile: ProfileCommon,
    pub number_of_beams: u8,
    pub coordinate_system: CoordinateSystem,
    pub number_of_cells: u16,
    pub stm: Option<StmExtension>,
    /// m/s, beam-major: `velocity[beam * cells + cell]`
    pub velocity: Vec<f64>,
    /// dB, beam-major
    pub amplitude: Vec<f64>,
    /// percent, beam-major
    pub correlation: Vec<u8>,
    pub altimeter: Option<Altimeter>,
    pub ast: Option<Ast>,
    pub altimeter_raw: Option<AltimeterRaw>,
    pub ahrs: Option<Ahrs>,
    pub percentage_good: Vec<u8>,
    pub std_deviation: Option<StdDeviation>,
}

impl CurrentProfile {
    pub fn decode(cursor: &mut Cursor, header: &RecordHeader) -> Result<Self> {
        let data_start = header.data_start;
        let profile = ProfileCommon::decode(cursor, data_start)?;

        cursor.seek_to(data_start + 30)?;
        let mut bf = BitField::new(cursor.take(2)?);
        let number_of_beams = bf.take_bits(4)? as u8;
        let coordinate_system = CoordinateSystem::from_value(bf.take_bits(2)?);
        let number_of_cells = bf.take_bits(10)? as u16;

        cursor.seek_to(data_start + profile.common.offset_of_data as usize)?;
        // Only two of the family's tags carry the extension; unrecognized
        // tags fall back to none so firmware additions stay decodable.
        let stm = match header.data_series_id {
            series::BURST | series::BURST_ALTIMETER_RAW => Some(StmExtension {
                scattering: cursor.read_f32()?,
                high_range: cursor.read_f32()?,
            }),
            _ => None,
        };

        let flags = &profile.flags;
        let scale = profile.common.velocity_scale();
        let samples = usize::from(number_of_cells) * usize::from(number_of_beams);

        let mut velocity = Vec::new();
        if flags.has_velocity_data && flags.has_correlation_data {
            velocity.reserve(samples);
            for _ in 0..samples {
                velocity.push(scale * f64::from(cursor.read_i16()?));
            }
        }

        let mut amplitude = Vec::new();
        if flags.has_amplitude_data && flags.has_correlation_data {
            amplitude.reserve(samples);
            for _ in 0..samples {
                amplitude.push(0.5 * f64::from(cursor.read_u8()?));
            }
        }

        let mut correlation = Vec::new();
        if flags.has_correlation_data {
            correlation = cursor.take(samples)?.to_vec();
        }

        let altimeter = if flags.has_altimeter_data {
            Some(Altimeter {
                distance: cursor.read_f32()?,
                quality: cursor.read_u16()?,
                status: cursor.read_u16()?,
            })
        } else {
            None
        };

        let ast = if flags.has_ast_data {
            Some(Ast {
                distance: cursor.read_f32()?,
                quality: cursor.read_u16()?,
                offset: cursor.read_i16()?,
                pressure: cursor.read_f32()?,
            })
        } else {
            None
        };

        let altimeter_raw = if flags.has_altimeter_raw_data {
            let num_samples = cursor.read_u32()? as usize;
            let samples_distance = 1e-4 * f64::from(cursor.read_u16()?);
            // reservation capped by the bytes actually remaining
            let mut samples = Vec::with_capacity(num_samples.min(cursor.remaining() / 2));
            for _ in 0..num_samples {
                samples.push(cursor.read_i16()?);
            }
            Some(AltimeterRaw {
                samples_distance,
                samples,
            })
        } else {
            None
        };

        let ahrs = if flags.has_ahrs_data {
            let mut rotation_matrix = [0f32; 9];
            for v in &mut rotation_matrix {
                *v = cursor.read_f32()?;
            }
            let mut quaternion = [0f32; 4];
            for v in &mut quaternion {
                *v = cursor.read_f32()?;
            }
            let mut gyro = [0f32; 3];
            for v in &mut gyro {
                *v = cursor.read_f32()?;
            }
            Some(Ahrs {
                rotation_matrix,
                quaternion,
                gyro,
            })
        } else {
            None
        };

        let mut percentage_good = Vec::new();
        if flags.has_percentage_good_data {
            percentage_good = cursor.take(usize::from(number_of_cells))?.to_vec();
        }

        let std_deviation = if flags.has_std_deviation_data {
            Some(StdDeviation {
                pitch: 0.01 * f64::from(cursor.read_i16()?),
                roll: 0.01 * f64::from(cursor.read_i16()?),
                heading: 0.01 * f64::from(cursor.read_i16()?),
                pressure: 0.001 * f64::from(cursor.read_i16()?),
            })
        } else {
            None
        };

        Ok(CurrentProfile {
            header: *header,
            profile,
            number_of_beams,
            coordinate_system,
            number_of_cells,
            stm,
            velocity,
            amplitude,
            correlation,
            altimeter,
            ast,
            altimeter_raw,
            ahrs,
            percentage_good,
            std_deviation,
        })
    }
}

/// An echosounder profile record (series tag 0x1c).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EchosounderProfile {
    pub header: RecordHeader,
    pub profile: ProfileCommon,
    pub number_of_cells: u16,
    /// kHz
    pub frequency: u16,
    /// dB, one value per cell
    pub amplitude: Vec<f64>,
}

impl EchosounderProfile {
    pub fn decode(cursor: &mut Cursor, header: &RecordHeader) -> Result<Self> {
        let data_start = header.data_start;
        let profile = ProfileCommon::decode(cursor, data_start)?;

        cursor.seek_to(data_start + 30)?;
        let number_of_cells = cursor.read_u16()?;
        cursor.seek_to(data_start + 52)?;
        let frequency = cursor.read_u16()?;

        cursor.seek_to(data_start + profile.common.offset_of_data as usize)?;
        let mut amplitude = Vec::with_capacity(usize::from(number_of_cells));
        for _ in 0..number_of_cells {
            amplitude.push(0.01 * f64::from(cursor.read_u16()?));
        }

        Ok(EchosounderProfile {
            header: *header,
            profile,
            number_of_cells,
            frequency,
            amplitude,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Hz
    pub start_frequency: f32,
    /// Hz
    pub step_frequency: f32,
    /// beam-major, `beams * bins` values
    pub bins: Vec<i16>,
}

/// A spectrum profile record (series tag 0x20).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpectrumProfile {
    pub header: RecordHeader,
    pub profile: ProfileCommon,
    pub number_of_beams: u8,
    pub number_of_bins: u16,
    pub spectrum: Option<Spectrum>,
}

impl SpectrumProfile {
    /// Gap between the data offset and the spectrum section.
    const SPECTRUM_LEAD: usize = 56;

    pub fn decode(cursor: &mut Cursor, header: &RecordHeader) -> Result<Self> {
        let data_start = header.data_start;
        let profile = ProfileCommon::decode(cursor, data_start)?;

        cursor.seek_to(data_start + 30)?;
        let mut bf = BitField::new(cursor.take(2)?);
        let number_of_beams = bf.take_bits(3)? as u8;
        let number_of_bins = bf.take_bits(13)? as u16;

        cursor.seek_to(
            data_start + profile.common.offset_of_data as usize + Self::SPECTRUM_LEAD,
        )?;
        let spectrum = if profile.flags.has_spectrum_data {
            let start_frequency = cursor.read_f32()?;
            let step_frequency = cursor.read_f32()?;
            let n = usize::from(number_of_beams) * usize::from(number_of_bins);
            let mut bins = Vec::with_capacity(n);
            for _ in 0..n {
                bins.push(cursor.read_i16()?);
            }
            Some(Spectrum {
                start_frequency,
                step_frequency,
                bins,
            })
        } else {
            None
        };

        Ok(SpectrumProfile {
            header: *header,
            profile,
            number_of_beams,
            number_of_bins,
            spectrum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_system_labels() {
        assert_eq!(CoordinateSystem::from_value(0).label(), "ENU");
        assert_eq!(CoordinateSystem::from_value(1).label(), "XYZ");
        assert_eq!(CoordinateSystem::from_value(2).label(), "BEAM");
        assert_eq!(CoordinateSystem::from_value(3).label(), "not used");
    }
}
