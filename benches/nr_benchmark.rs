use criterion::{criterion_group, criterion_main, Criterion};
use ecnr::bignum::BigNum;
use ecnr::context::CurveContext;
use ecnr::nr::{self, Signature};
use ecnr::params::CurveParams;
use ecnr::scratch::ScratchBuffer;
use std::hint::black_box;

const KEY: &str = "C477F9F65C22CCE20657FAA5B2D1D8122336F851A508A1ED04E479C34985BF96";
const NONCE: &str = "7A1A7E52797FC8CAAA435D2A4DACE39158504BF204FBE19F14DBB427FAEE50AE";
const MSG: &str = "4B688DF40BCEDBE641DDB16FF0A1842D9C67EA1C3BF63F3E0471BAA664531D1A";

fn bench_sign(c: &mut Criterion) {
    for params in [CurveParams::p256(), CurveParams::secp256k1()] {
        let ctx = CurveContext::<4>::from_params(&params).unwrap();
        let mut scratch = ScratchBuffer::for_sign();
        let (x, k, m) = (
            BigNum::from_hex(KEY).unwrap(),
            BigNum::from_hex(NONCE).unwrap(),
            BigNum::from_hex(MSG).unwrap(),
        );
        let mut sig = Signature::for_context(&ctx);
        c.bench_function(&format!("sign_{}", ctx.name()), |b| {
            b.iter(|| {
                nr::sign(
                    black_box(&m),
                    &x,
                    &k,
                    &mut sig.c,
                    &mut sig.d,
                    &ctx,
                    &mut scratch,
                )
            })
        });
    }
}

fn bench_verify(c: &mut Criterion) {
    for params in [CurveParams::p256(), CurveParams::secp256k1()] {
        let ctx = CurveContext::<4>::from_params(&params).unwrap();
        let mut scratch = ScratchBuffer::for_verify();
        let x = BigNum::from_hex(KEY).unwrap();
        let m = BigNum::from_hex(MSG).unwrap();
        let q = ctx.public_key(&x, &mut scratch).unwrap();
        let mut sig = Signature::for_context(&ctx);
        nr::sign(
            &m,
            &x,
            &BigNum::from_hex(NONCE).unwrap(),
            &mut sig.c,
            &mut sig.d,
            &ctx,
            &mut scratch,
        )
        .unwrap();
        c.bench_function(&format!("verify_{}", ctx.name()), |b| {
            b.iter(|| nr::verify(black_box(&m), &q, &sig.c, &sig.d, &ctx, &mut scratch))
        });
    }
}

criterion_group!(benches, bench_sign, bench_verify);
criterion_main!(benches);
