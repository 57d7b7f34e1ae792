//! Calldata construction for every contract call the runner makes.
//!
//! Selectors come from the canonical signatures via `ethers::utils::id`.
//! The two campaign contracts without a published ABI answer fixed
//! four-byte selectors with zero-padded tails; those are built here by
//! `opaque_mint` and `opaque_stake` so the rest of the crate never handles
//! raw hex strings.

use ethers::abi::{encode, Token};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::id;

/// Number of trailing zero words after the encoded arguments of the
/// opaque mint call.
const MINT_PAD_WORDS: usize = 5;
/// Trailing zero words after the encoded argument of the opaque stake call.
const STAKE_PAD_WORDS: usize = 6;

fn selector(signature: &str) -> [u8; 4] {
    id(signature)
}

fn with_selector(sel: [u8; 4], tokens: &[Token]) -> Bytes {
    let mut data = sel.to_vec();
    data.extend(encode(tokens));
    Bytes::from(data)
}

fn pad_zero_words(data: &mut Vec<u8>, words: usize) {
    data.extend(std::iter::repeat(0u8).take(words * 32));
}

// ---------------------------------------------------------------------------
// ERC-20 and pair reads
// ---------------------------------------------------------------------------

pub fn balance_of(owner: Address) -> Bytes {
    with_selector(selector("balanceOf(address)"), &[Token::Address(owner)])
}

pub fn get_reserves() -> Bytes {
    Bytes::from(selector("getReserves()").to_vec())
}

pub fn token0() -> Bytes {
    Bytes::from(selector("token0()").to_vec())
}

pub fn coins(index: u64) -> Bytes {
    with_selector(selector("coins(uint256)"), &[Token::Uint(U256::from(index))])
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

pub fn approve(spender: Address, amount: U256) -> Bytes {
    with_selector(
        selector("approve(address,uint256)"),
        &[Token::Address(spender), Token::Uint(amount)],
    )
}

pub fn swap_exact_tokens_for_tokens(
    amount_in: U256,
    min_out: U256,
    path: &[Address],
    to: Address,
    deadline: U256,
) -> Bytes {
    with_selector(
        selector("swapExactTokensForTokens(uint256,uint256,address[],address,uint256)"),
        &[
            Token::Uint(amount_in),
            Token::Uint(min_out),
            Token::Array(path.iter().map(|a| Token::Address(*a)).collect()),
            Token::Address(to),
            Token::Uint(deadline),
        ],
    )
}

pub fn stake(token: Address, value: U256) -> Bytes {
    with_selector(
        selector("stake(address,uint256)"),
        &[Token::Address(token), Token::Uint(value)],
    )
}

#[allow(clippy::too_many_arguments)]
pub fn add_liquidity(
    token_a: Address,
    token_b: Address,
    amount_a: U256,
    amount_b: U256,
    min_a: U256,
    min_b: U256,
    to: Address,
    deadline: U256,
) -> Bytes {
    with_selector(
        selector(
            "addLiquidity(address,address,uint256,uint256,uint256,uint256,address,uint256)",
        ),
        &[
            Token::Address(token_a),
            Token::Address(token_b),
            Token::Uint(amount_a),
            Token::Uint(amount_b),
            Token::Uint(min_a),
            Token::Uint(min_b),
            Token::Address(to),
            Token::Uint(deadline),
        ],
    )
}

/// Curve-style `add_liquidity(uint256[] amounts, uint256 min_mint, address
/// receiver)`.
pub fn pool_deposit(amounts: &[U256], min_mint: U256, receiver: Address) -> Bytes {
    with_selector(
        selector("add_liquidity(uint256[],uint256,address)"),
        &[
            Token::Array(amounts.iter().map(|a| Token::Uint(*a)).collect()),
            Token::Uint(min_mint),
            Token::Address(receiver),
        ],
    )
}

// ---------------------------------------------------------------------------
// Opaque calls
// ---------------------------------------------------------------------------

/// Mint call against the unpublished-ABI synthetic contract: selector
/// `0x095e7a95`, recipient, amount, then five zero words.
pub fn opaque_mint(recipient: Address, amount: U256) -> Bytes {
    let mut data = vec![0x09, 0x5e, 0x7a, 0x95];
    data.extend(encode(&[Token::Address(recipient), Token::Uint(amount)]));
    pad_zero_words(&mut data, MINT_PAD_WORDS);
    Bytes::from(data)
}

/// Stake call against the unpublished-ABI staking contract: selector
/// `0x1a5f0f00`, amount, then six zero words.
pub fn opaque_stake(amount: U256) -> Bytes {
    let mut data = vec![0x1a, 0x5f, 0x0f, 0x00];
    data.extend(encode(&[Token::Uint(amount)]));
    pad_zero_words(&mut data, STAKE_PAD_WORDS);
    Bytes::from(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
