//! Cosmetic deployment parameters picked from fixed catalogs.

use core_logic::traits::VariantPicker;
use ethers::abi::Token;
use ethers::types::U256;
use std::time::Duration;

pub const CONFIDENTIAL_NAMES: [&str; 40] = [
    "Stealth", "Shadow", "Ghost", "Phantom", "Enigma", "Cipher", "Secret", "Mystic", "Covert",
    "Obscure", "Whisper", "Phantom", "Mirage", "Eclipse", "Noir", "Veil", "Silhouette", "Shade",
    "Umbra", "Spectre", "Wraith", "Twilight", "Illusion", "Arcane", "Nebula", "Occult", "Nimbus",
    "Incognito", "Cloak", "Shroud", "Revenant", "Dusk", "Nocturne", "Phantom", "Eerie", "Ethereal",
    "Hidden", "Discreet", "Anonymous", "Clandestine",
];

pub const MEME_NAMES: [&str; 50] = [
    "PEPE", "DOGE", "SHIB", "MOON", "CHAD", "WOJAK", "CHEEMS", "BONK", "FROG", "APE", "SNEK",
    "HONK", "STONK", "DINO", "HODL", "MEME", "GIGA", "ALPHA", "SIGMA", "BETA", "CATTO", "DOGGO",
    "BIRB", "PHROG", "TOAD", "BENIS", "MONKE", "PANDA", "DOOT", "YEET", "BOOMER", "ZOOMER",
    "CHONK", "DANK", "WAGMI", "NGMI", "MOAI", "NOOT", "PAMP", "DUMP", "FOMO", "COPIUM", "RARE",
    "BOBO", "WOOF", "MEOW", "GUCCI", "LAMBO", "REKT", "BASED",
];

pub const MEME_PREFIXES: [&str; 15] = [
    "", "Baby", "Mega", "Super", "Hyper", "Ultra", "Based", "Sigma", "Alpha", "Gigachad", "Epic",
    "Dank", "Lit", "Smol", "Thicc",
];

pub const MEME_SUFFIXES: [&str; 15] = [
    "", "Inu", "Moon", "Rocket", "Elon", "Coin", "DAO", "Finance", "Cash", "X", "AI", "World",
    "Verse", "Chain", "Labs",
];

/// (name, symbol)
pub const NFT_COLLECTIONS: [(&str, &str); 39] = [
    ("Cosmic Cats", "CCAT"),
    ("Pixel Pirates", "PIXA"),
    ("Mystic Monsters", "MMON"),
    ("Digital Dragons", "DDRG"),
    ("Space Samurai", "SAMU"),
    ("Cyber Chiefs", "CYBR"),
    ("Meta Monks", "MONK"),
    ("Neon Knights", "NKNT"),
    ("Astral Avatars", "ASTR"),
    ("Blockchain Brawlers", "BRWL"),
    ("Crypto Champions", "CHMP"),
    ("Desert Druids", "DRUID"),
    ("Electric Elves", "ELVE"),
    ("Forgotten Foxes", "FOXS"),
    ("Galactic Gorillas", "GAPE"),
    ("Haunted Heroes", "HHRO"),
    ("Interstellar Insects", "INST"),
    ("Jungle Jaguars", "JAGS"),
    ("Kinetic Koalas", "KOAS"),
    ("Lunar Lions", "LION"),
    ("Mythical Mermaids", "MERM"),
    ("Nebula Narwhals", "NRWL"),
    ("Oceanic Orcas", "ORCA"),
    ("Primal Panthers", "PNTR"),
    ("Quantum Qubits", "QBIT"),
    ("Renaissance Robots", "ROBO"),
    ("Savage Sharks", "SHRK"),
    ("Techno Tigers", "TIGR"),
    ("United Unicorns", "UNCO"),
    ("Virtual Vikings", "VKNG"),
    ("Wizard Wolves", "WOLF"),
    ("Xenial Xenomorphs", "XENO"),
    ("Yin Yang Yetis", "YETI"),
    ("Zealous Zebras", "ZBRA"),
    ("Alien Astronauts", "ALIEN"),
    ("Bizarre Bats", "BATS"),
    ("Celestial Centaurs", "CENT"),
    ("Divine Dinos", "DINO"),
    ("Emerald Eagles", "EGLE"),
];

/// 0.00001 native units.
pub const NFT_MINT_PRICE_WEI: u64 = 10_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
}

impl TokenParams {
    pub fn constructor_args(&self) -> Vec<Token> {
        vec![
            Token::String(self.name.clone()),
            Token::String(self.symbol.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftParams {
    pub name: String,
    pub symbol: String,
    pub base_uri: String,
    pub max_supply: u64,
    pub price: U256,
}

impl NftParams {
    pub fn constructor_args(&self) -> Vec<Token> {
        vec![
            Token::String(self.name.clone()),
            Token::String(self.symbol.clone()),
            Token::String(self.base_uri.clone()),
            Token::Uint(U256::from(self.max_supply)),
            Token::Uint(self.price),
        ]
    }
}

fn pick<'a>(picker: &dyn VariantPicker, items: &[&'a str]) -> &'a str {
    items[picker.pick(items.len()).min(items.len() - 1)]
}

/// Name from the catalog, symbol is its first 2 to 4 letters uppercased.
pub fn confidential_token(picker: &dyn VariantPicker) -> TokenParams {
    let name = pick(picker, &CONFIDENTIAL_NAMES);
    let symbol_len = (2 + picker.pick(3)).min(name.len());
    TokenParams {
        name: name.to_string(),
        symbol: name[..symbol_len].to_uppercase(),
    }
}

/// Base name doubles as the symbol. A prefix is added 3 times in 10 and a
/// suffix 4 times in 10.
pub fn meme_token(picker: &dyn VariantPicker) -> TokenParams {
    let prefix = if picker.pick(10) >= 7 {
        pick(picker, &MEME_PREFIXES)
    } else {
        ""
    };
    let base = pick(picker, &MEME_NAMES);
    let suffix = if picker.pick(10) >= 6 {
        pick(picker, &MEME_SUFFIXES)
    } else {
        ""
    };

    TokenParams {
        name: format!("{}{}{}", prefix, base, suffix),
        symbol: base.to_string(),
    }
}

pub fn nft_collection(picker: &dyn VariantPicker) -> NftParams {
    let last = NFT_COLLECTIONS.len() - 1;
    let (name, symbol) = NFT_COLLECTIONS[picker.pick(NFT_COLLECTIONS.len()).min(last)];
    NftParams {
        name: name.to_string(),
        symbol: symbol.to_string(),
        base_uri: format!("https://api.nft.com/{}/", symbol.to_lowercase()),
        max_supply: 1000 + picker.pick(9000) as u64,
        price: U256::from(NFT_MINT_PRICE_WEI),
    }
}

/// Mints after an NFT deployment, 1 to 5.
pub fn mint_count(picker: &dyn VariantPicker) -> u32 {
    1 + picker.pick(5) as u32
}

/// Pause after each mint, 2 to 7 seconds.
pub fn mint_delay(picker: &dyn VariantPicker) -> Duration {
    Duration::from_millis(2000 + picker.pick(5000) as u64)
}
