// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `encrypt` and `decrypt` commands.

use std::io::{self, Read};

use warden_core::SecretCipher;

use super::load_config;
use crate::cli::{CipherArgs, Cli};
use crate::error::{BinError, BinResult};

/// Encrypts a value the way the resource server stores secrets.
pub fn encrypt(cli: &Cli, args: CipherArgs) -> BinResult<()> {
    let cipher = cipher_for(cli, &args)?;
    let value = read_value(&args)?;

    println!("{}", cipher.encrypt(&value)?);
    Ok(())
}

/// Decrypts a value produced by [`encrypt`].
pub fn decrypt(cli: &Cli, args: CipherArgs) -> BinResult<()> {
    let cipher = cipher_for(cli, &args)?;
    let value = read_value(&args)?;

    println!("{}", cipher.decrypt(&value)?);
    Ok(())
}

fn cipher_for(cli: &Cli, args: &CipherArgs) -> BinResult<SecretCipher> {
    let secret = match &args.secret {
        Some(secret) => secret.clone(),
        None => load_config(cli)?.resource.cipher_secret,
    };
    if secret.is_empty() {
        return Err(BinError::config(
            "No cipher secret. Use --secret, WARDEN_CIPHER_SECRET or resource.cipher_secret",
        ));
    }
    Ok(SecretCipher::new(&secret))
}

fn read_value(args: &CipherArgs) -> BinResult<String> {
    match &args.value {
        Some(value) => Ok(value.clone()),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| BinError::Io(format!("Failed to read from stdin: {}", e)))?;
            Ok(input.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}
