// Address encoding prefixes
// Version bytes placed in front of base58check payloads, one set per network

/// Kinds of base58check encoded data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base58Type {
    PubkeyAddress,
    ScriptAddress,
    ScriptAddress2,
    SecretKey,
    ExtPublicKey,
    ExtSecretKey,
}

impl Base58Type {
    pub const ALL: [Base58Type; 6] = [
        Base58Type::PubkeyAddress,
        Base58Type::ScriptAddress,
        Base58Type::ScriptAddress2,
        Base58Type::SecretKey,
        Base58Type::ExtPublicKey,
        Base58Type::ExtSecretKey,
    ];
}

/// Prefix bytes for every [`Base58Type`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base58Prefixes {
    pub pubkey_address: u8,
    pub script_address: u8,
    pub script_address2: u8,
    pub secret_key: u8,
    /// BIP32 extended public key version
    pub ext_public_key: [u8; 4],
    /// BIP32 extended private key version
    pub ext_secret_key: [u8; 4],
}

impl Base58Prefixes {
    /// Prefix bytes for `kind`, as prepended to the payload before base58check
    pub fn get(&self, kind: Base58Type) -> &[u8] {
        match kind {
            Base58Type::PubkeyAddress => std::slice::from_ref(&self.pubkey_address),
            Base58Type::ScriptAddress => std::slice::from_ref(&self.script_address),
            Base58Type::ScriptAddress2 => std::slice::from_ref(&self.script_address2),
            Base58Type::SecretKey => std::slice::from_ref(&self.secret_key),
            Base58Type::ExtPublicKey => &self.ext_public_key,
            Base58Type::ExtSecretKey => &self.ext_secret_key,
        }
    }

    /// Find which kind of data a decoded payload holds by its leading bytes
    pub fn classify(&self, payload: &[u8]) -> Option<Base58Type> {
        // Extended keys first, their four-byte versions are the longer match
        [Base58Type::ExtPublicKey, Base58Type::ExtSecretKey]
            .into_iter()
            .chain(Base58Type::ALL.into_iter().take(4))
            .find(|&kind| payload.starts_with(self.get(kind)))
    }
}
