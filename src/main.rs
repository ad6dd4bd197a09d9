//! NR signature command line tool
//!
//! Messages are given as `--message TEXT` or `--message-hex BYTES` (hashed with
//! `--hash`, default SHA-256), or as `--msg-hex HEX`, a message representative
//! used as is. The default curve is P-256.

use clap::{Args, Parser, Subcommand};
use ecnr::bigint::BigInt;
use ecnr::bignum::BigNum;
use ecnr::context::CurveContext;
use ecnr::hash::HashAlg;
use ecnr::nr::{self, Signature, VerifyResult};
use ecnr::params::CurveParams;
use ecnr::scratch::ScratchBuffer;
use ecnr::NrError;
use std::path::PathBuf;
use std::time::Instant;

/// Limbs used by the command line tool; enough for 256-bit curves
const LIMBS: usize = 4;

type Ctx = CurveContext<LIMBS>;

/// NR signatures over prime-field elliptic curves
#[derive(Parser)]
#[command(name = "ecnr")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign a message
    Sign {
        #[command(flatten)]
        curve: CurveArgs,

        /// Regular private key (hex)
        #[arg(long, value_parser = BigNum::from_hex)]
        key: BigNum,

        /// Ephemeral key (hex); never reuse it
        #[arg(long, value_parser = BigNum::from_hex)]
        nonce: BigNum,

        #[command(flatten)]
        message: MessageArgs,

        /// Hash for --message and --message-hex
        #[arg(long, default_value = "sha256")]
        hash: HashAlg,
    },
    /// Verify a signature
    Verify {
        #[command(flatten)]
        curve: CurveArgs,

        /// Public key x, comma-separated coefficients for extension fields
        #[arg(long, required = true, value_delimiter = ',', value_parser = parse_coefficient)]
        pub_x: Vec<BigInt<LIMBS>>,

        /// Public key y, comma-separated coefficients for extension fields
        #[arg(long, required = true, value_delimiter = ',', value_parser = parse_coefficient)]
        pub_y: Vec<BigInt<LIMBS>>,

        #[arg(long, value_parser = BigNum::from_hex)]
        c: BigNum,

        #[arg(long, value_parser = BigNum::from_hex)]
        d: BigNum,

        #[command(flatten)]
        message: MessageArgs,

        /// Hash for --message and --message-hex
        #[arg(long, default_value = "sha256")]
        hash: HashAlg,
    },
    /// Print the public key of a private key
    Pubkey {
        #[command(flatten)]
        curve: CurveArgs,

        #[arg(long, value_parser = BigNum::from_hex)]
        key: BigNum,
    },
    /// Sign and verify "abc" on the built-in curves
    Demo,
}

#[derive(Args)]
#[group(multiple = false)]
struct CurveArgs {
    /// Built-in curve: p256 or secp256k1
    #[arg(long)]
    curve: Option<String>,

    /// Curve parameter JSON file
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct MessageArgs {
    /// Message text, hashed
    #[arg(long)]
    message: Option<String>,

    /// Message bytes (hex), hashed
    #[arg(long)]
    message_hex: Option<String>,

    /// Message representative (hex), used without hashing
    #[arg(long, value_parser = BigNum::from_hex)]
    msg_hex: Option<BigNum>,
}

enum Message {
    Representative(BigNum),
    Bytes(Vec<u8>, HashAlg),
}

impl MessageArgs {
    fn resolve(self, hash: HashAlg) -> Result<Message, String> {
        match (self.message, self.message_hex, self.msg_hex) {
            (_, _, Some(m)) => Ok(Message::Representative(m)),
            (_, Some(bytes), None) => hex::decode(bytes)
                .map(|b| Message::Bytes(b, hash))
                .map_err(|e| format!("--message-hex: {}", e)),
            (Some(text), None, None) => Ok(Message::Bytes(text.into_bytes(), hash)),
            (None, None, None) => Err("a message is required".to_string()),
        }
    }
}

impl CurveArgs {
    fn load(&self) -> Result<Ctx, String> {
        let params = match (&self.params, &self.curve) {
            (Some(path), _) => CurveParams::from_file(path).map_err(|e| e.to_string())?,
            (None, Some(name)) => {
                CurveParams::builtin(name).ok_or_else(|| format!("unknown curve {:?}", name))?
            }
            (None, None) => CurveParams::p256(),
        };
        CurveContext::from_params(&params).map_err(|e| e.to_string())
    }
}

fn parse_coefficient(hex: &str) -> Result<BigInt<LIMBS>, String> {
    BigInt::from_hex(hex).ok_or_else(|| format!("bad hex {:?}", hex))
}

fn main() {
    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Sign {
            curve,
            key,
            nonce,
            message,
            hash,
        } => cmd_sign(&curve, &key, &nonce, message.resolve(hash)),
        Command::Verify {
            curve,
            pub_x,
            pub_y,
            c,
            d,
            message,
            hash,
        } => cmd_verify(&curve, &pub_x, &pub_y, &c, &d, message.resolve(hash)),
        Command::Pubkey { curve, key } => cmd_pubkey(&curve, &key),
        Command::Demo => cmd_demo(),
    };

    if let Err(e) = outcome {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_sign(
    curve: &CurveArgs,
    key: &BigNum,
    nonce: &BigNum,
    message: Result<Message, String>,
) -> Result<(), String> {
    let ctx = curve.load()?;
    let mut scratch = ScratchBuffer::for_sign();
    let mut sig = Signature::for_context(&ctx);

    let result = match message? {
        Message::Representative(m) => {
            nr::sign(&m, key, nonce, &mut sig.c, &mut sig.d, &ctx, &mut scratch)
        }
        Message::Bytes(bytes, alg) => nr::sign_message(
            &bytes,
            alg,
            key,
            nonce,
            &mut sig.c,
            &mut sig.d,
            &ctx,
            &mut scratch,
        ),
    };
    match result {
        Ok(()) => {
            println!("c = {}", sig.c.to_hex());
            println!("d = {}", sig.d.to_hex());
            Ok(())
        }
        Err(NrError::SignatureDegenerate) => {
            Err("degenerate signature, pick another nonce".to_string())
        }
        Err(e) => Err(e.to_string()),
    }
}

fn cmd_verify(
    curve: &CurveArgs,
    pub_x: &[BigInt<LIMBS>],
    pub_y: &[BigInt<LIMBS>],
    c: &BigNum,
    d: &BigNum,
    message: Result<Message, String>,
) -> Result<(), String> {
    let ctx = curve.load()?;
    let q = ctx
        .point_from_affine(pub_x, pub_y)
        .map_err(|e| e.to_string())?;
    let mut scratch = ScratchBuffer::for_verify();

    let result = match message? {
        Message::Representative(m) => nr::verify(&m, &q, c, d, &ctx, &mut scratch),
        Message::Bytes(bytes, alg) => {
            nr::verify_message(&bytes, alg, &q, c, d, &ctx, &mut scratch)
        }
    }
    .map_err(|e| e.to_string())?;

    println!("{}", result);
    if result == VerifyResult::Invalid {
        std::process::exit(3);
    }
    Ok(())
}

fn cmd_pubkey(curve: &CurveArgs, key: &BigNum) -> Result<(), String> {
    let ctx = curve.load()?;
    let mut scratch = ScratchBuffer::for_sign();
    let q = ctx.public_key(key, &mut scratch).map_err(|e| e.to_string())?;
    let (x, y) = ctx
        .point_to_affine(&q)
        .ok_or_else(|| "public key is the point at infinity".to_string())?;
    let join = |v: Vec<BigInt<LIMBS>>| v.iter().map(|c| c.to_hex()).collect::<Vec<_>>().join(",");
    println!("x = {}", join(x));
    println!("y = {}", join(y));
    Ok(())
}

fn cmd_demo() -> Result<(), String> {
    println!("================================================================================");
    println!("NR signatures over P-256 and secp256k1");
    println!("================================================================================\n");

    for params in [CurveParams::p256(), CurveParams::secp256k1()] {
        let ctx: Ctx = CurveContext::from_params(&params).map_err(|e| e.to_string())?;
        let mut scratch = ScratchBuffer::for_verify();
        let key = BigNum::from_hex("C477F9F65C22CCE20657FAA5B2D1D8122336F851A508A1ED04E479C34985BF96")
            .map_err(|e| e.to_string())?;
        let nonce = BigNum::from_hex("7A1A7E52797FC8CAAA435D2A4DACE39158504BF204FBE19F14DBB427FAEE50AE")
            .map_err(|e| e.to_string())?;
        let q = ctx.public_key(&key, &mut scratch).map_err(|e| e.to_string())?;

        let mut sig = Signature::for_context(&ctx);
        let start = Instant::now();
        nr::sign_message(
            b"abc",
            HashAlg::Sha256,
            &key,
            &nonce,
            &mut sig.c,
            &mut sig.d,
            &ctx,
            &mut scratch,
        )
        .map_err(|e| e.to_string())?;
        let sign_time = start.elapsed();

        let start = Instant::now();
        let result = nr::verify_message(b"abc", HashAlg::Sha256, &q, &sig.c, &sig.d, &ctx, &mut scratch)
            .map_err(|e| e.to_string())?;
        let verify_time = start.elapsed();

        println!("[{}]", ctx.name());
        println!("  message: \"abc\" (SHA-256)");
        println!("  c = {}", sig.c.to_hex());
        println!("  d = {}", sig.d.to_hex());
        println!("  sign:   {:?}", sign_time);
        println!("  verify: {} ({:?})", result, verify_time);
        println!();
    }
    Ok(())
}
