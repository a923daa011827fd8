//! The common data block shared by the current-profile record family, and
//! the bit-packed words used across record kinds.
//!
//! Reference: Nortek Signature Integration, data format version 3.
use serde::{Deserialize, Serialize};

use crate::bits::BitField;
use crate::bytes::Cursor;
use crate::timecode::DateTime;
use crate::Result;

/// Accelerometer counts to g.
pub const ACCELEROMETER_SCALE: f64 = 9.819 / 16384.0;

pub(crate) fn wake_up_label(value: u8) -> &'static str {
    match value {
        0 => "bad power",
        1 => "power applied",
        2 => "break",
        3 => "RTC alarm",
        _ => "unknown",
    }
}

/// Instrument error status word.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ErrorStatus {
    /// The raw 16-bit word.
    pub value: u16,
    pub tag_error_beam1_in_phase: bool,
    pub tag_error_beam1_quadrature: bool,
    pub tag_error_beam2_in_phase: bool,
    pub tag_error_beam2_quadrature: bool,
    pub tag_error_beam3_in_phase: bool,
    pub tag_error_beam3_quadrature: bool,
    pub tag_error_beam4_in_phase: bool,
    pub tag_error_beam4_quadrature: bool,
    pub data_retrieval_fifo_error: bool,
    pub data_retrieval_overflow: bool,
    pub data_retrieval_underrun: bool,
    pub data_retrieval_samples_missing: bool,
    pub measurement_not_finished: bool,
    pub sensor_read_failure: bool,
}

impl ErrorStatus {
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let span = cursor.take(2)?;
        let mut bf = BitField::new(span);
        let zult = ErrorStatus {
            value: u16::from_le_bytes([span[0], span[1]]),
            tag_error_beam1_in_phase: bf.take_bit()?,
            tag_error_beam1_quadrature: bf.take_bit()?,
            tag_error_beam2_in_phase: bf.take_bit()?,
            tag_error_beam2_quadrature: bf.take_bit()?,
            tag_error_beam3_in_phase: bf.take_bit()?,
            tag_error_beam3_quadrature: bf.take_bit()?,
            tag_error_beam4_in_phase: bf.take_bit()?,
            tag_error_beam4_quadrature: bf.take_bit()?,
            data_retrieval_fifo_error: bf.take_bit()?,
            data_retrieval_overflow: bf.take_bit()?,
            data_retrieval_underrun: bf.take_bit()?,
            data_retrieval_samples_missing: bf.take_bit()?,
            measurement_not_finished: bf.take_bit()?,
            sensor_read_failure: bf.take_bit()?,
        };
        bf.skip_bits(2)?;
        Ok(zult)
    }
}

/// The 32-bit status word of profile and echosounder records.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Status {
    /// The raw 32-bit word.
    pub value: u32,
    pub wake_up_state: u8,
    pub orientation: u8,
    pub auto_orientation: u8,
    pub previous_wake_up_state: u8,
    pub previous_measurement_skipped_low_voltage: bool,
    pub active_configuration: bool,
    /// One-based echosounder frequency index.
    pub echosounder_index: u8,
    pub telemetry_data: bool,
    pub boost_running: bool,
    pub echosounder_frequency_bin: u8,
    /// Blanking distance is in cm units when set, mm otherwise.
    pub blanking_distance_scaling_cm: bool,
}

impl Status {
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let span = cursor.take(4)?;
        let mut bf = BitField::new(span);
        let wake_up_state = bf.take_bits(4)? as u8;
        let orientation = bf.take_bits(3)? as u8;
        let auto_orientation = bf.take_bits(3)? as u8;
        let previous_wake_up_state = bf.take_bits(4)? as u8;
        let previous_measurement_skipped_low_voltage = bf.take_bit()?;
        let active_configuration = bf.take_bit()?;
        let echosounder_index = bf.take_bits(4)? as u8 + 1;
        let telemetry_data = bf.take_bit()?;
        let boost_running = bf.take_bit()?;
        let echosounder_frequency_bin = bf.take_bits(5)? as u8;
        bf.skip_bits(3)?;
        let blanking_distance_scaling_cm = bf.take_bit()?;
        bf.skip_bits(1)?;
        Ok(Status {
            value: u32::from_le_bytes([span[0], span[1], span[2], span[3]]),
            wake_up_state,
            orientation,
            auto_orientation,
            previous_wake_up_state,
            previous_measurement_skipped_low_voltage,
            active_configuration,
            echosounder_index,
            telemetry_data,
            boost_running,
            echosounder_frequency_bin,
            blanking_distance_scaling_cm,
        })
    }

    #[must_use]
    pub fn wake_up_state_label(&self) -> &'static str {
        wake_up_label(self.wake_up_state)
    }

    #[must_use]
    pub fn previous_wake_up_state_label(&self) -> &'static str {
        wake_up_label(self.previous_wake_up_state)
    }

    /// Orientation labels for the profile record family.
    #[must_use]
    pub fn orientation_label(&self) -> &'static str {
        match self.orientation {
            0 => "XUP",
            1 => "XDOWN",
            2 => "YUP",
            3 => "YDOWN",
            4 => "ZUP",
            5 => "ZDOWN",
            7 => "AHRS",
            _ => "unknown",
        }
    }

    /// Auto-orientation labels for the profile record family. The raw
    /// echosounder records use a slightly different table, see
    /// [`crate::record::echosounder::auto_orientation_label`].
    #[must_use]
    pub fn auto_orientation_label(&self) -> &'static str {
        match self.auto_orientation {
            0 => "Fixed",
            1 => "Auto",
            3 => "AHRS3D",
            _ => "unknown",
        }
    }
}

/// Extended status word of profile records.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExtendedStatus {
    /// The raw 16-bit word.
    pub value: u16,
    pub internal_processing: bool,
    pub should_be_interpreted: bool,
    pub processor_idles_less_than_3_percent: bool,
    pub processor_idles_less_than_6_percent: bool,
    pub processor_idles_less_than_12_percent: bool,
    pub external_sound_velocity_probe: bool,
    pub external_heading_pitch_roll_position: bool,
    pub external_heading: bool,
    pub external_pitch_roll: bool,
    pub file_system_flush: bool,
}

impl ExtendedStatus {
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let span = cursor.take(2)?;
        let mut bf = BitField::new(span);
        let internal_processing = bf.take_bit()?;
        let should_be_interpreted = bf.take_bit()?;
        bf.skip_bits(6)?;
        Ok(ExtendedStatus {
            value: u16::from_le_bytes([span[0], span[1]]),
            internal_processing,
            should_be_interpreted,
            processor_idles_less_than_3_percent: bf.take_bit()?,
            processor_idles_less_than_6_percent: bf.take_bit()?,
            processor_idles_less_than_12_percent: bf.take_bit()?,
            external_sound_velocity_probe: bf.take_bit()?,
            external_heading_pitch_roll_position: bf.take_bit()?,
            external_heading: bf.take_bit()?,
            external_pitch_roll: bf.take_bit()?,
            file_system_flush: bf.take_bit()?,
        })
    }
}

/// Presence flags gating the variable sections of profile records.
///
/// Each `has_*` flag contributes a 0/1 factor to the length of the section
/// it gates; an array is entirely absent when any of its gating flags is
/// unset.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PresenceFlags {
    pub has_spectrum_data: bool,
    pub has_std_deviation_data: bool,
    pub has_percentage_good_data: bool,
    pub has_ahrs_data: bool,
    pub has_echosounder_data: bool,
    pub has_ast_data: bool,
    pub has_altimeter_raw_data: bool,
    pub has_altimeter_data: bool,
    pub has_correlation_data: bool,
    pub has_amplitude_data: bool,
    pub has_velocity_data: bool,
    pub has_external_sensor: bool,
    pub has_tilt_sensor: bool,
    pub has_compass_sensor: bool,
    pub has_temperature_sensor: bool,
    pub has_pressure_sensor: bool,
}

impl PresenceFlags {
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let mut bf = BitField::new(cursor.take(2)?);
        Ok(PresenceFlags {
            has_spectrum_data: bf.take_bit()?,
            has_std_deviation_data: bf.take_bit()?,
            has_percentage_good_data: bf.take_bit()?,
            has_ahrs_data: bf.take_bit()?,
            has_echosounder_data: bf.take_bit()?,
            has_ast_data: bf.take_bit()?,
            has_altimeter_raw_data: bf.take_bit()?,
            has_altimeter_data: bf.take_bit()?,
            has_correlation_data: bf.take_bit()?,
            has_amplitude_data: bf.take_bit()?,
            has_velocity_data: bf.take_bit()?,
            has_external_sensor: bf.take_bit()?,
            has_tilt_sensor: bf.take_bit()?,
            has_compass_sensor: bf.take_bit()?,
            has_temperature_sensor: bf.take_bit()?,
            has_pressure_sensor: bf.take_bit()?,
        })
    }
}

/// The fixed common block at the start of every profile-family body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommonData {
    pub version: u8,
    /// Offset of the record's variable sections, relative to the data start.
    pub offset_of_data: u8,
    pub serial_number: u32,
    pub datetime: DateTime,
    /// m/s
    pub speed_of_sound: f64,
    /// degrees C
    pub temperature: f64,
    /// Raw pressure counts (0.001 dBar).
    pub pressure: u32,
    /// degrees
    pub heading: f64,
    /// degrees
    pub pitch: f64,
    /// degrees
    pub roll: f64,
    /// m
    pub cell_size: f64,
    pub nominal_correlation: u8,
    /// V
    pub battery_voltage: f64,
    pub magnetometer: [i16; 3],
    /// g
    pub accelerometer: [f64; 3],
    pub data_set_description: u16,
    pub transmitted_energy: u16,
    /// Power-of-ten exponent applied to raw velocity counts.
    pub velocity_scaling: i8,
    pub power_level: i8,
    /// degrees C
    pub magnetometer_temperature: f64,
    pub real_time_clock_temperature: i16,
    pub error_status: ErrorStatus,
    pub ensemble_counter: u32,
}

impl CommonData {
    /// Encoded size in bytes.
    pub const LEN: usize = 70;

    /// Decode the block with the cursor positioned at the record's data
    /// start. Bytes 2..4 hold the presence flags and are decoded separately
    /// by [`ProfileCommon`].
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let version = cursor.read_u8()?;
        let offset_of_data = cursor.read_u8()?;
        cursor.take(2)?;
        let serial_number = cursor.read_u32()?;
        let datetime = DateTime::decode(cursor)?;
        let speed_of_sound = 0.1 * f64::from(cursor.read_u16()?);
        let temperature = 0.01 * f64::from(cursor.read_i16()?);
        let pressure = cursor.read_u32()?;
        let heading = 0.01 * f64::from(cursor.read_u16()?);
        let pitch = 0.01 * f64::from(cursor.read_i16()?);
        let roll = 0.01 * f64::from(cursor.read_i16()?);
        cursor.take(2)?;
        let cell_size = 0.001 * f64::from(cursor.read_u16()?);
        cursor.take(2)?;
        let nominal_correlation = cursor.read_u8()?;
        cursor.take(1)?;
        let battery_voltage = 0.1 * f64::from(cursor.read_u16()?);
        let magnetometer = [cursor.read_i16()?, cursor.read_i16()?, cursor.read_i16()?];
        let accelerometer = [
            ACCELEROMETER_SCALE * f64::from(cursor.read_i16()?),
            ACCELEROMETER_SCALE * f64::from(cursor.read_i16()?),
            ACCELEROMETER_SCALE * f64::from(cursor.read_i16()?),
        ];
        cursor.take(2)?;
        let data_set_description = cursor.read_u16()?;
        let transmitted_energy = cursor.read_u16()?;
        let velocity_scaling = cursor.read_i8()?;
        let power_level = cursor.read_i8()?;
        let magnetometer_temperature = 0.001 * f64::from(cursor.read_i16()?);
        let real_time_clock_temperature = cursor.read_i16()?;
        let error_status = ErrorStatus::decode(cursor)?;
        let ensemble_counter = cursor.read_u32()?;
        Ok(CommonData {
            version,
            offset_of_data,
            serial_number,
            datetime,
            speed_of_sound,
            temperature,
            pressure,
            heading,
            pitch,
            roll,
            cell_size,
            nominal_correlation,
            battery_voltage,
            magnetometer,
            accelerometer,
            data_set_description,
            transmitted_energy,
            velocity_scaling,
            power_level,
            magnetometer_temperature,
            real_time_clock_temperature,
            error_status,
            ensemble_counter,
        })
    }

    /// Factor converting raw velocity counts to m/s.
    #[must_use]
    pub fn velocity_scale(&self) -> f64 {
        10f64.powi(i32::from(self.velocity_scaling))
    }
}

/// Common block plus the profile-family fields reached by anchored seeks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileCommon {
    pub common: CommonData,
    pub flags: PresenceFlags,
    /// degrees C
    pub temperature_pressure_sensor: f64,
    /// m/s
    pub ambiguity_velocity: f64,
    pub extended_status: ExtendedStatus,
    pub status: Status,
    /// m
    pub blanking_distance: f64,
}

impl ProfileCommon {
    /// Decode with the cursor at `data_start`. The fields after the common
    /// block do not form a monotonic layout; each is reached by an anchored
    /// seek. The extended status deliberately re-reads two bytes also
    /// covered by the ensemble counter.
    pub fn decode(cursor: &mut Cursor, data_start: usize) -> Result<Self> {
        let common = CommonData::decode(cursor)?;

        cursor.seek_to(data_start + 2)?;
        let flags = PresenceFlags::decode(cursor)?;

        cursor.seek_to(data_start + 37)?;
        let temperature_pressure_sensor = f64::from(cursor.read_u8()?) / 5.0 - 4.0;

        cursor.seek_to(data_start + 52)?;
        let ambiguity_velocity = common.velocity_scale() * f64::from(cursor.read_u16()?);

        cursor.seek_to(data_start + 66)?;
        let extended_status = ExtendedStatus::decode(cursor)?;
        let status = Status::decode(cursor)?;

        cursor.seek_to(data_start + 36)?;
        let blanking_scale = if status.blanking_distance_scaling_cm {
            0.01
        } else {
            0.001
        };
        let blanking_distance = blanking_scale * f64::from(cursor.read_u16()?);

        Ok(ProfileCommon {
            common,
            flags,
            temperature_pressure_sensor,
            ambiguity_velocity,
            extended_status,
            status,
            blanking_distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_flags_bit_positions() {
        // velocity=bit5, amplitude=bit6, correlation=bit7, pressure=bit0
        let word: u16 = (1 << 5) | (1 << 6) | (1 << 7) | 1;
        let dat = word.to_le_bytes();
        let mut c = Cursor::new(&dat);
        let flags = PresenceFlags::decode(&mut c).unwrap();

        assert!(flags.has_velocity_data);
        assert!(flags.has_amplitude_data);
        assert!(flags.has_correlation_data);
        assert!(flags.has_pressure_sensor);
        assert!(!flags.has_spectrum_data);
        assert!(!flags.has_ahrs_data);
    }

    #[test]
    fn status_subfields() {
        // wake-up=RTC alarm(3), orientation=ZDOWN(5), auto=Auto(1),
        // previous=break(2), blanking scaling in cm
        let mut word: u32 = 0;
        word |= 3 << 28; // wake up state
        word |= 5 << 25; // orientation
        word |= 1 << 22; // auto orientation
        word |= 2 << 18; // previous wake up state
        word |= 1 << 16; // active configuration
        word |= 2 << 12; // echosounder index (raw)
        word |= 1 << 1; // blanking distance scaling
        let dat = word.to_le_bytes();
        let mut c = Cursor::new(&dat);
        let status = Status::decode(&mut c).unwrap();

        assert_eq!(status.value, word);
        assert_eq!(status.wake_up_state_label(), "RTC alarm");
        assert_eq!(status.orientation_label(), "ZDOWN");
        assert_eq!(status.auto_orientation_label(), "Auto");
        assert_eq!(status.previous_wake_up_state_label(), "break");
        assert!(status.active_configuration);
        assert_eq!(status.echosounder_index, 3);
        assert!(status.blanking_distance_scaling_cm);
        assert!(!status.boost_running);
    }

    #[test]
    fn status_unknown_labels() {
        let word: u32 = 0xf << 28 | 6 << 25 | 2 << 22;
        let dat = word.to_le_bytes();
        let mut c = Cursor::new(&dat);
        let status = Status::decode(&mut c).unwrap();

        assert_eq!(status.wake_up_state_label(), "unknown");
        assert_eq!(status.orientation_label(), "unknown");
        assert_eq!(status.auto_orientation_label(), "unknown");
    }

    #[test]
    fn error_status_subfields() {
        // beam1 in-phase tag error = bit15, fifo error = bit7
        let word: u16 = (1 << 15) | (1 << 7);
        let dat = word.to_le_bytes();
        let mut c = Cursor::new(&dat);
        let es = ErrorStatus::decode(&mut c).unwrap();

        assert!(es.tag_error_beam1_in_phase);
        assert!(es.data_retrieval_fifo_error);
        assert!(!es.sensor_read_failure);
        assert_eq!(es.value, word);
    }
}
