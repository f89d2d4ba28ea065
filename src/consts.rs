//! KMP Constants

// Frame sentinels
pub const KMP_START_REQUEST: u8 = 0x80;
pub const KMP_START_RESPONSE: u8 = 0x40;
pub const KMP_END: u8 = 0x0d;
pub const KMP_ESCAPE: u8 = 0x1b;
pub const KMP_ACK: u8 = 0x06;

/// Bytes which are never sent raw between the sentinels
pub const KMP_RESERVED: [u8; 5] = [
    KMP_ACK,
    KMP_END,
    KMP_ESCAPE,
    KMP_START_RESPONSE,
    KMP_START_REQUEST,
];

/// Bytes silently dropped by the receiver
pub const KMP_NOISE: [u8; 2] = [0xff, KMP_START_RESPONSE];

// KMP commands
pub const KMP_DST_HEAT_METER: u8 = 0x3f;
pub const KMP_CID_GET_REGISTER: u8 = 0x10;

// Link defaults
pub const KMP_BAUD_RATE: u32 = 1200;
pub const KMP_DEFAULT_TIMEOUT_MS: u64 = 300;
pub const KMP_DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Longest mantissa accepted from the meter, in bytes
pub const KMP_MAX_MANTISSA_LEN: usize = 4;

// Multical 402 registers
pub const KMP_REG_ENERGY: u16 = 0x003c;
pub const KMP_REG_VOLUME: u16 = 0x0044;
pub const KMP_REG_FLOW: u16 = 0x004a;
pub const KMP_REG_POWER: u16 = 0x0050;
pub const KMP_REG_TEMP_FLOW: u16 = 0x0056;
pub const KMP_REG_TEMP_RETURN: u16 = 0x0057;
pub const KMP_REG_TEMP_DIFF: u16 = 0x0059;
