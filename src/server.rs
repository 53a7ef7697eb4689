/// In-process keymaster speaking the same wire protocol as the real one,
/// backed by freshly generated random tables per session. Lets the remote
/// client and the full attack be exercised over actual HTTP.
use crate::cipher::{encrypt, Permutation, Substitution};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::net::{TcpListener, ToSocketAddrs};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct Session {
    p: Permutation,
    s: Substitution,
    rounds: u32,
}

#[derive(Default)]
struct Keymaster {
    next_key: u64,
    sessions: HashMap<u64, Session>,
}

type Shared = Arc<Mutex<Keymaster>>;

pub async fn spawn_keymaster(address: impl ToSocketAddrs) -> String {
    let state: Shared = Arc::new(Mutex::new(Keymaster::default()));
    let app = Router::new()
        .route("/genkey", get(genkey))
        .route("/encrypt", get(encrypt_block))
        .route("/guess", get(judge_guess))
        .with_state(state);
    let listener = TcpListener::bind(address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn genkey(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let rounds = match params.get("rounds").and_then(|r| r.parse().ok()) {
        Some(r @ (2 | 3)) => r,
        _ => return (StatusCode::BAD_REQUEST, "rounds must be 2 or 3".into()),
    };

    let mut rng = StdRng::from_entropy();
    let mut p: Permutation = std::array::from_fn(|i| i as u8);
    p.shuffle(&mut rng);
    let mut s: Substitution = std::array::from_fn(|x| x as u8);
    s.shuffle(&mut rng);

    let mut keymaster = state.lock().unwrap();
    keymaster.next_key += 1;
    let key = keymaster.next_key;
    keymaster.sessions.insert(key, Session { p, s, rounds });

    (
        StatusCode::OK,
        format!("Key generated. Your key number is <b>{key}</b>.\n"),
    )
}

async fn encrypt_block(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let plaintext = match params
        .get("data")
        .and_then(|data| u128::from_str_radix(data, 16).ok())
    {
        Some(plaintext) => plaintext,
        None => return (StatusCode::BAD_REQUEST, "missing or bad 'data'".into()),
    };

    let keymaster = state.lock().unwrap();
    match lookup(&keymaster, &params) {
        Some(session) => {
            let ciphertext = encrypt(plaintext, &session.p, &session.s, session.rounds);
            (StatusCode::OK, format!("{ciphertext:032X}\n"))
        }
        None => (StatusCode::BAD_REQUEST, "unknown key".into()),
    }
}

async fn judge_guess(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let p_guess: Permutation = match params.get("p").and_then(|hex| parse_table(hex)) {
        Some(p) => p,
        None => return (StatusCode::BAD_REQUEST, "missing or bad 'p'".into()),
    };
    let s_guess: Substitution = match params.get("S").and_then(|hex| parse_table(hex)) {
        Some(s) => s,
        None => return (StatusCode::BAD_REQUEST, "missing or bad 'S'".into()),
    };

    let keymaster = state.lock().unwrap();
    let session = match lookup(&keymaster, &params) {
        Some(session) => session,
        None => return (StatusCode::BAD_REQUEST, "unknown key".into()),
    };

    // Equivalent table pairs produce the same encryption function, so the
    // verdict is functional: the guess wins if it encrypts like the session
    // key does on a batch of probe plaintexts.
    let mut rng = StdRng::from_entropy();
    let matches = std::iter::once(0u128)
        .chain((0..256).map(|_| rng.gen()))
        .all(|plaintext| {
            encrypt(plaintext, &session.p, &session.s, session.rounds)
                == encrypt(plaintext, &p_guess, &s_guess, session.rounds)
        });
    if matches {
        (StatusCode::OK, "Correct! The keymaster yields.\n".into())
    } else {
        (StatusCode::OK, "Incorrect guess.\n".into())
    }
}

fn lookup<'a>(keymaster: &'a Keymaster, params: &HashMap<String, String>) -> Option<&'a Session> {
    let key: u64 = params.get("key")?.parse().ok()?;
    keymaster.sessions.get(&key)
}

fn parse_table<const N: usize>(hex: &str) -> Option<[u8; N]> {
    if hex.len() != 2 * N || !hex.is_ascii() {
        return None;
    }
    let mut table = [0u8; N];
    for (entry, pair) in table.iter_mut().zip(hex.as_bytes().chunks(2)) {
        *entry = u8::from_str_radix(std::str::from_utf8(pair).ok()?, 16).ok()?;
    }
    Some(table)
}
