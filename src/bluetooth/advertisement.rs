/// Generic parsing of BLE advertising data (EIR structures)
use log::debug;

use crate::models::Advertisement;

// AD type codes from the Bluetooth Generic Access Profile assigned numbers
const AD_UUID16_INCOMPLETE: u8 = 0x02;
const AD_UUID16_COMPLETE: u8 = 0x03;
const AD_UUID128_INCOMPLETE: u8 = 0x06;
const AD_UUID128_COMPLETE: u8 = 0x07;
const AD_NAME_SHORTENED: u8 = 0x08;
const AD_NAME_COMPLETE: u8 = 0x09;
const AD_TX_POWER_LEVEL: u8 = 0x0A;
const AD_SERVICE_DATA: u8 = 0x16;
const AD_MANUFACTURER_DATA: u8 = 0xFF;

/// Parse a raw advertising data buffer into an [`Advertisement`]
///
/// The buffer is a concatenation of length-prefixed AD structures with
/// layout `[length][type][data...]`, where `length` counts the type byte
/// plus the data. Parsing walks the buffer until fewer than two bytes
/// remain. A zero length or a declared length that overruns the buffer
/// terminates the walk; whatever was accumulated up to that point is
/// returned. Malformed input is therefore never an error.
///
/// # Arguments
/// * `data` - Raw advertising data bytes from a discovery event
///
/// # Returns
/// The decoded advertisement record, possibly empty
pub fn parse_advertisement(data: &[u8]) -> Advertisement {
    let mut advertisement = Advertisement::default();
    let mut i = 0;

    while i + 1 < data.len() {
        let length = data[i] as usize;
        if length < 1 {
            debug!("Invalid AD structure at offset {}: zero length", i);
            break;
        }
        if i + length + 1 > data.len() {
            debug!(
                "Invalid AD structure at offset {}: length {} overruns buffer of {} bytes",
                i,
                length,
                data.len()
            );
            break;
        }

        let ad_type = data[i + 1];
        let payload = &data[i + 2..i + 1 + length];

        match ad_type {
            AD_UUID16_INCOMPLETE | AD_UUID16_COMPLETE => {
                for chunk in payload.chunks_exact(2) {
                    let uuid = format!("{:x}", u16::from_le_bytes([chunk[0], chunk[1]]));
                    push_service_uuid(&mut advertisement, uuid);
                }
            }
            AD_UUID128_INCOMPLETE | AD_UUID128_COMPLETE => {
                // 128-bit UUIDs are emitted as a forward byte-by-byte hex
                // string, not in the reversed standard UUID text form.
                for block in payload.chunks_exact(16) {
                    let uuid: String = block.iter().map(|b| format!("{:x}", b)).collect();
                    push_service_uuid(&mut advertisement, uuid);
                }
            }
            AD_NAME_SHORTENED | AD_NAME_COMPLETE => {
                advertisement.local_name = Some(String::from_utf8_lossy(payload).into_owned());
            }
            AD_TX_POWER_LEVEL => {
                if let Some(&level) = payload.first() {
                    advertisement.tx_power_level = Some(level as i8);
                }
            }
            AD_SERVICE_DATA => {
                // Recognized, but the payload is not carried in the record
            }
            AD_MANUFACTURER_DATA => {
                advertisement.manufacturer_data = Some(payload.to_vec());
            }
            _ => {}
        }

        i += length + 1;
    }

    advertisement
}

fn push_service_uuid(advertisement: &mut Advertisement, uuid: String) {
    if !advertisement.service_uuids.contains(&uuid) {
        advertisement.service_uuids.push(uuid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_yields_empty_record() {
        assert_eq!(parse_advertisement(&[]), Advertisement::default());
    }

    #[test]
    fn single_byte_buffer_yields_empty_record() {
        assert_eq!(parse_advertisement(&[0x02]), Advertisement::default());
    }

    #[test]
    fn decodes_16_bit_service_uuid_list() {
        // Complete list of 16-bit UUIDs containing 0x181A
        let advertisement = parse_advertisement(&[0x03, 0x03, 0x1A, 0x18]);
        assert_eq!(advertisement.service_uuids, vec!["181a".to_string()]);
    }

    #[test]
    fn deduplicates_service_uuids() {
        // The same UUID in an incomplete and a complete list
        let advertisement = parse_advertisement(&[
            0x03, 0x02, 0x1A, 0x18, // incomplete list
            0x03, 0x03, 0x1A, 0x18, // complete list
        ]);
        assert_eq!(advertisement.service_uuids, vec!["181a".to_string()]);
    }

    #[test]
    fn decodes_multiple_16_bit_uuids_in_one_structure() {
        let advertisement = parse_advertisement(&[0x05, 0x03, 0x1A, 0x18, 0x0F, 0x18]);
        assert_eq!(
            advertisement.service_uuids,
            vec!["181a".to_string(), "180f".to_string()]
        );
    }

    #[test]
    fn decodes_128_bit_uuid_in_broadcast_byte_order() {
        let mut data = vec![0x11, 0x07];
        data.extend_from_slice(&[
            0xDC, 0xCA, 0x4E, 0x12, 0xC5, 0xA5, 0x9A, 0x8F, //
            0x62, 0x4A, 0x62, 0x82, 0xC0, 0x62, 0x5A, 0xC5,
        ]);
        let advertisement = parse_advertisement(&data);
        assert_eq!(
            advertisement.service_uuids,
            vec!["dcca4e12c5a59a8f624a6282c0625ac5".to_string()]
        );
    }

    #[test]
    fn decodes_local_name() {
        let advertisement = parse_advertisement(&[0x05, 0x09, b'T', b'e', b's', b't']);
        assert_eq!(advertisement.local_name.as_deref(), Some("Test"));
    }

    #[test]
    fn later_local_name_overwrites_earlier() {
        let advertisement = parse_advertisement(&[
            0x03, 0x08, b'A', b'B', // shortened name
            0x03, 0x09, b'C', b'D', // complete name
        ]);
        assert_eq!(advertisement.local_name.as_deref(), Some("CD"));
    }

    #[test]
    fn decodes_tx_power_level_as_signed() {
        // 0xF4 = -12 dBm
        let advertisement = parse_advertisement(&[0x02, 0x0A, 0xF4]);
        assert_eq!(advertisement.tx_power_level, Some(-12));
    }

    #[test]
    fn decodes_manufacturer_data() {
        let advertisement = parse_advertisement(&[0x05, 0xFF, 0x99, 0x04, 0xAA, 0xBB]);
        assert_eq!(
            advertisement.manufacturer_data.as_deref(),
            Some(&[0x99, 0x04, 0xAA, 0xBB][..])
        );
    }

    #[test]
    fn later_manufacturer_data_overwrites_earlier() {
        let advertisement = parse_advertisement(&[
            0x03, 0xFF, 0x01, 0x02, //
            0x03, 0xFF, 0x03, 0x04,
        ]);
        assert_eq!(
            advertisement.manufacturer_data.as_deref(),
            Some(&[0x03, 0x04][..])
        );
    }

    #[test]
    fn service_data_payload_is_not_recorded() {
        let advertisement = parse_advertisement(&[0x05, 0x16, 0x1A, 0x18, 0x01, 0x02]);
        assert_eq!(advertisement, Advertisement::default());
    }

    #[test]
    fn unknown_types_are_skipped() {
        // Flags structure (0x01) followed by a name
        let advertisement = parse_advertisement(&[0x02, 0x01, 0x06, 0x03, 0x09, b'H', b'i']);
        assert_eq!(advertisement.local_name.as_deref(), Some("Hi"));
        assert!(advertisement.service_uuids.is_empty());
    }

    #[test]
    fn zero_length_terminates_parsing() {
        let advertisement = parse_advertisement(&[
            0x03, 0x03, 0x1A, 0x18, // valid structure
            0x00, 0x09, b'X', b'X', // zero length stops the walk
        ]);
        assert_eq!(advertisement.service_uuids, vec!["181a".to_string()]);
        assert_eq!(advertisement.local_name, None);
    }

    #[test]
    fn overrunning_length_returns_prior_structures_only() {
        let advertisement = parse_advertisement(&[
            0x03, 0x03, 0x1A, 0x18, // valid structure
            0x10, 0x09, b'X', // declares 16 bytes, only 2 remain
        ]);
        assert_eq!(advertisement.service_uuids, vec!["181a".to_string()]);
        assert_eq!(advertisement.local_name, None);
    }

    #[test]
    fn parsing_is_idempotent() {
        let data = [
            0x02, 0x01, 0x06, 0x03, 0x03, 0x1A, 0x18, 0x05, 0x09, b'T', b'e', b's', b't',
        ];
        assert_eq!(parse_advertisement(&data), parse_advertisement(&data));
    }
}
