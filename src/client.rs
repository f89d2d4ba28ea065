use crate::consts::{
    KMP_CID_GET_REGISTER, KMP_DST_HEAT_METER, KMP_MAX_MANTISSA_LEN, KMP_START_REQUEST,
};
use crate::{crc16, generate_frame, parse_frame, ErrorKind, VectorTrait};

// dst + cid + up to 8 data bytes + CRC
const MAX_REQUEST_BODY: usize = 12;

/// KMP client request generator/processor
///
/// One object can be used for multiple calls. The register of the last generated request is
/// remembered, so responses can be matched against it. Setting `reg` directly allows decoding
/// payloads received by other means.
pub struct KmpRequest {
    /// destination address, default: heat meter (0x3F)
    pub dst: u8,
    pub reg: u16,
}

impl Default for KmpRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl KmpRequest {
    pub fn new() -> Self {
        Self {
            dst: KMP_DST_HEAT_METER,
            reg: 0,
        }
    }

    /// Generate a "get register" request for a single register
    ///
    /// ```
    /// use multical402::client::KmpRequest;
    ///
    /// let mut mreq = KmpRequest::new();
    /// let mut request = Vec::new();
    /// mreq.generate_get_register(0x003c, &mut request).unwrap();
    /// assert_eq!(request[0], 0x80);
    /// assert_eq!(request[request.len() - 1], 0x0d);
    /// ```
    pub fn generate_get_register<V: VectorTrait<u8>>(
        &mut self,
        reg: u16,
        request: &mut V,
    ) -> Result<(), ErrorKind> {
        self.reg = reg;
        let [hi, lo] = reg.to_be_bytes();
        // one register requested
        self.generate(&[0x01, hi, lo], request)
    }

    fn generate<V: VectorTrait<u8>>(&self, data: &[u8], request: &mut V) -> Result<(), ErrorKind> {
        let len = data.len() + 4;
        if len > MAX_REQUEST_BODY {
            return Err(ErrorKind::OOB);
        }
        let mut body = [0u8; MAX_REQUEST_BODY];
        body[0] = self.dst;
        body[1] = KMP_CID_GET_REGISTER;
        body[2..len - 2].copy_from_slice(data);
        // the CRC placeholder is left zeroed
        let crc = crc16(&body[..len]);
        body[len - 2..len].copy_from_slice(&crc.to_be_bytes());
        generate_frame(KMP_START_REQUEST, &body[..len], request)?;
        log::trace!("KMP request: {:02X?}", request.as_slice());
        Ok(())
    }

    fn check_header(&self, payload: &[u8]) -> Result<(), ErrorKind> {
        if payload.len() < 7 {
            return Err(ErrorKind::FrameBroken);
        }
        if payload[0] != self.dst || payload[1] != KMP_CID_GET_REGISTER {
            return Err(ErrorKind::HeaderMismatch);
        }
        // reply to a stale or foreign request
        if u16::from_be_bytes([payload[2], payload[3]]) != self.reg {
            return Err(ErrorKind::HeaderMismatch);
        }
        Ok(())
    }

    /// Parse unescaped response payload (CRC stripped) into a float
    ///
    /// Payload layout: dst, cid, reg (2 bytes), unit, mantissa length, sign/exponent, mantissa
    pub fn parse_f32(&self, payload: &[u8]) -> Result<f32, ErrorKind> {
        self.check_header(payload)?;
        let n = payload[5] as usize;
        if n > KMP_MAX_MANTISSA_LEN || payload.len() < 7 + n {
            return Err(ErrorKind::FrameBroken);
        }
        let x = payload[7..7 + n]
            .iter()
            .fold(0u32, |x, b| (x << 8) | u32::from(*b));
        let si = payload[6];
        let e = u32::from(si & 0x3f);
        let mut value = if si & 0x40 == 0 {
            f64::from(x) * pow10(e)
        } else {
            f64::from(x) / pow10(e)
        };
        if si & 0x80 != 0 {
            value = -value;
        }
        Ok(value as f32)
    }

    /// Get the raw unit code of the response
    pub fn parse_unit(&self, payload: &[u8]) -> Result<u8, ErrorKind> {
        self.check_header(payload)?;
        Ok(payload[4])
    }

    /// Parse raw response frame and decode its value
    ///
    /// `raw` is the frame as collected from the wire (see [`crate::transport::receive_frame`]),
    /// `payload` is a scratch buffer for the unescaped payload
    pub fn parse_response<V: VectorTrait<u8>>(
        &self,
        raw: &[u8],
        payload: &mut V,
    ) -> Result<f32, ErrorKind> {
        parse_frame(raw, payload)?;
        log::trace!("KMP response: {:02X?}", payload.as_slice());
        self.parse_f32(payload.as_slice())
    }
}

fn pow10(e: u32) -> f64 {
    let mut p = 1.0;
    for _ in 0..e {
        p *= 10.0;
    }
    p
}
