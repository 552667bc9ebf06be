//! USB identifiers for Grizzly Bear controllers

/// Atmel vendor ID used by the controller firmware
pub const VENDOR_ID: u16 = 0x03EB;

/// Grizzly Bear product ID
pub const PRODUCT_ID: u16 = 0x204F;

/// Factory bus address
pub const DEFAULT_ADDRESS: u8 = 0x0F;

/// Check if a VID/PID pair belongs to a Grizzly controller
#[inline]
pub fn is_grizzly(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && pid == PRODUCT_ID
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ControllerConfig;

    #[test]
    fn test_known_ids() {
        assert!(is_grizzly(0x03EB, 0x204F));
        assert!(!is_grizzly(0x03EB, 0x2FF4)); // Atmel DFU bootloader
        assert!(!is_grizzly(0x0000, 0x204F));
    }

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.vendor_id, VENDOR_ID);
        assert_eq!(config.product_id, PRODUCT_ID);
        assert_eq!(config.address, 0x0F);
        assert_eq!(config.address_register_value(), 0x1E);
    }

    #[test]
    fn test_address_register_value_wraps() {
        let config = ControllerConfig::default().with_address(0x81);
        assert_eq!(config.address_register_value(), 0x02);
    }
}
