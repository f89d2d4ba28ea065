#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use multical402::client::KmpRequest;
use std::vec::Vec;

#[derive(Debug, Arbitrary)]
struct FuzzInput<'a> {
    reg: u16,
    raw: &'a [u8],
}

fuzz_target!(|data: FuzzInput| {
    // we only care about panics so we can ignore results
    let _ = fuzz_response(data);
});

fn fuzz_response(input: FuzzInput) -> Result<f32, multical402::ErrorKind> {
    let mut mreq = KmpRequest::new();
    let mut request: Vec<u8> = Vec::new();
    mreq.generate_get_register(input.reg, &mut request)?;
    let mut payload: Vec<u8> = Vec::new();
    let _ = mreq.parse_f32(input.raw);
    mreq.parse_response(input.raw, &mut payload)
}
