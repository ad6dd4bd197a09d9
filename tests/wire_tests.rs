use ecnr::bignum::BigNum;
use ecnr::context::CurveContext;
use ecnr::params::CurveParams;
use ecnr::scratch::ScratchBuffer;
use ecnr::wire::{
    handle_sign, handle_verify, sign_json, verify_json, SignRequest, SignResponse, VerifyRequest,
    WireBigNum, WireObject, WirePoint,
};
use ecnr::NrError;

fn big(value: &str) -> Option<WireObject> {
    Some(WireObject::BigNum(WireBigNum {
        value: value.into(),
        room: Some(4),
    }))
}

#[test]
fn test_p256_json_round_trip() {
    let ctx = CurveContext::<4>::from_params(&CurveParams::p256()).unwrap();
    let mut scratch = ScratchBuffer::for_verify();
    let x = "C477F9F65C22CCE20657FAA5B2D1D8122336F851A508A1ED04E479C34985BF96";
    let m = "4B688DF40BCEDBE641DDB16FF0A1842D9C67EA1C3BF63F3E0471BAA664531D1A";

    let req = SignRequest {
        msg: big(m),
        reg_key: big(x),
        eph_key: big("7A1A7E52797FC8CAAA435D2A4DACE39158504BF204FBE19F14DBB427FAEE50AE"),
        sign_c: big("0"),
        sign_d: big("0"),
    };
    let out = sign_json(&serde_json::to_string(&req).unwrap(), &ctx, &mut scratch).unwrap();
    let resp: SignResponse = serde_json::from_str(&out).unwrap();
    assert_eq!(
        resp.sign_c,
        WireObject::BigNum(WireBigNum {
            value: "76AB836ADC4E1D4C41438363A1F193AF80B41B8B5B017E33779771412E992D69".into(),
            room: Some(4),
        })
    );

    let q = ctx
        .public_key(&BigNum::from_hex(x).unwrap(), &mut scratch)
        .unwrap();
    let req = VerifyRequest {
        msg: big(m),
        pub_key: Some(WireObject::from_point(&ctx, &q).unwrap()),
        sign_c: Some(resp.sign_c),
        sign_d: Some(resp.sign_d),
    };
    let out = verify_json(&serde_json::to_string(&req).unwrap(), &ctx, &mut scratch).unwrap();
    assert_eq!(out, r#"{"result":"valid"}"#);
}

#[test]
fn test_small_output_room() {
    let ctx = CurveContext::<4>::from_params(&CurveParams::secp256k1()).unwrap();
    let mut scratch = ScratchBuffer::for_sign();
    let req = SignRequest {
        msg: big("3"),
        reg_key: big("1"),
        eph_key: big("2"),
        sign_c: Some(WireObject::BigNum(WireBigNum {
            value: "0".into(),
            room: Some(2),
        })),
        sign_d: big("0"),
    };
    assert_eq!(
        handle_sign(&req, &ctx, &mut scratch).unwrap_err(),
        NrError::BufferTooSmall
    );
}

#[test]
fn test_extension_curve_over_the_wire() {
    let params = CurveParams::from_json(
        r#"{"name":"gf49","prime":"7","extension":["1","0"],
            "a":["1","0"],"b":["3","0"],
            "generator":{"x":["1","3"],"y":["1","3"]},"order":"f"}"#,
    )
    .unwrap();
    let ctx = CurveContext::<1>::from_params(&params).unwrap();
    let mut scratch = ScratchBuffer::for_verify();

    let g = WireObject::from_point(&ctx, ctx.generator()).unwrap();
    let req = VerifyRequest {
        msg: big("3"),
        pub_key: Some(g.clone()),
        sign_c: big("1"),
        sign_d: big("1"),
    };
    assert_eq!(
        handle_verify(&req, &ctx, &mut scratch).unwrap_err(),
        NrError::UnsupportedMode
    );

    // tags are checked before the curve kind
    let req = VerifyRequest {
        pub_key: big("5"),
        ..req
    };
    assert_eq!(
        handle_verify(&req, &ctx, &mut scratch).unwrap_err(),
        NrError::ContextMismatch
    );

    let req = SignRequest {
        msg: big("3"),
        reg_key: big("1"),
        eph_key: big("2"),
        sign_c: big("0"),
        sign_d: None,
    };
    assert_eq!(
        handle_sign(&req, &ctx, &mut scratch).unwrap_err(),
        NrError::NullPointer
    );
}

#[test]
fn test_off_curve_public_key() {
    let ctx = CurveContext::<4>::from_params(&CurveParams::p256()).unwrap();
    let mut scratch = ScratchBuffer::for_verify();
    let out = verify_json(
        r#"{"msg":{"type":"big_num","value":"3"},
            "pub_key":{"type":"point","element_len":4,"x":["1"],"y":["2"]},
            "sign_c":{"type":"big_num","value":"1"},
            "sign_d":{"type":"big_num","value":"1"}}"#,
        &ctx,
        &mut scratch,
    );
    assert_eq!(out.unwrap_err(), NrError::InvalidPoint);
}

#[test]
fn test_oversized_room_is_rejected() {
    let ctx = CurveContext::<4>::from_params(&CurveParams::p256()).unwrap();
    let mut scratch = ScratchBuffer::for_sign();
    let out = sign_json(
        r#"{"msg":{"type":"big_num","value":"3"},
            "reg_key":{"type":"big_num","value":"5"},
            "eph_key":{"type":"big_num","value":"7"},
            "sign_c":{"type":"big_num","value":"0","room":18446744073709551615},
            "sign_d":{"type":"big_num","value":"0","room":4}}"#,
        &ctx,
        &mut scratch,
    );
    assert!(matches!(out, Err(NrError::Codec(_))));

    let room = WireBigNum {
        value: "0".into(),
        room: Some(5),
    };
    assert!(matches!(room.decode::<4>(), Err(NrError::Codec(_))));
    let room = WireBigNum {
        value: "0".into(),
        room: Some(4),
    };
    assert_eq!(room.decode::<4>().unwrap().room(), 4);
    assert_eq!(ctx.pool().usage().elements, 0);
}

#[test]
fn test_scratch_checked_before_decoding() {
    let ctx = CurveContext::<4>::from_params(&CurveParams::p256()).unwrap();
    let mut small = ScratchBuffer::for_sign();
    for x in ["1", "not hex"] {
        let req = VerifyRequest {
            msg: big("3"),
            pub_key: Some(WireObject::Point(WirePoint {
                element_len: 4,
                x: vec![x.into()],
                y: vec!["2".into()],
            })),
            sign_c: big("1"),
            sign_d: big("1"),
        };
        assert_eq!(
            handle_verify(&req, &ctx, &mut small).unwrap_err(),
            NrError::BufferTooSmall
        );
    }

    let req = SignRequest {
        msg: big("not hex"),
        reg_key: big("1"),
        eph_key: big("2"),
        sign_c: big("0"),
        sign_d: big("0"),
    };
    assert_eq!(
        handle_sign(&req, &ctx, &mut ScratchBuffer::new(0)).unwrap_err(),
        NrError::BufferTooSmall
    );
}
