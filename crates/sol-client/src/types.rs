use serde::{de, Deserialize, Deserializer};

use sol_tx::{Hash, PublicKey, SolError};

/// The `value` of a `getAccountInfo` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub lamports: u64,
    #[serde(deserialize_with = "pubkey_from_base58")]
    pub owner: PublicKey,
    pub executable: bool,
    #[serde(default)]
    pub rent_epoch: Option<u64>,
    /// Raw account data, decoded from whichever encoding the node used.
    #[serde(default, deserialize_with = "account_data")]
    pub data: Vec<u8>,
}

/// The `value` of a `getLatestBlockhash` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blockhash {
    pub blockhash: String,
    #[serde(default)]
    pub last_valid_block_height: Option<u64>,
}

impl Blockhash {
    pub fn hash(&self) -> Result<Hash, SolError> {
        Ok(self.blockhash.parse()?)
    }
}

fn pubkey_from_base58<'de, D>(deserializer: D) -> Result<PublicKey, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(de::Error::custom)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAccountData {
    Encoded(String, String),
    LegacyBase58(String),
}

fn account_data<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAccountData::deserialize(deserializer)? {
        RawAccountData::Encoded(data, encoding) => match encoding.as_str() {
            "base64" => base64::decode(&data).map_err(de::Error::custom),
            "base58" => bs58::decode(&data).into_vec().map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "unsupported account data encoding: {other}"
            ))),
        },
        RawAccountData::LegacyBase58(data) => {
            bs58::decode(&data).into_vec().map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn account_info_base64() {
        let value = json!({
            "lamports": 1_000_000_000u64,
            "owner": "11111111111111111111111111111111",
            "executable": false,
            "rentEpoch": 18_446_744_073_709_551_615u64,
            "data": ["AQID", "base64"],
            "space": 3
        });
        let info: AccountInfo = serde_json::from_value(value).unwrap();
        assert_eq!(info.lamports, 1_000_000_000);
        assert_eq!(info.owner, PublicKey::default());
        assert!(!info.executable);
        assert_eq!(info.rent_epoch, Some(u64::MAX));
        assert_eq!(info.data, vec![1, 2, 3]);
    }

    #[test]
    fn account_info_legacy_and_missing_fields() {
        let value = json!({
            "lamports": 5,
            "owner": "11111111111111111111111111111111",
            "executable": true,
            "data": "2VfUX"
        });
        let info: AccountInfo = serde_json::from_value(value).unwrap();
        assert!(info.executable);
        assert_eq!(info.rent_epoch, None);
        assert_eq!(info.data, bs58::decode("2VfUX").into_vec().unwrap());

        let bare = json!({
            "lamports": 5,
            "owner": "11111111111111111111111111111111",
            "executable": false
        });
        let info: AccountInfo = serde_json::from_value(bare).unwrap();
        assert!(info.data.is_empty());
    }

    #[test]
    fn account_info_rejects_bad_owner() {
        let value = json!({"lamports": 5, "owner": "not-a-key", "executable": false});
        assert!(serde_json::from_value::<AccountInfo>(value).is_err());
    }

    #[test]
    fn account_info_rejects_unknown_encoding() {
        let value = json!({
            "lamports": 5,
            "owner": "11111111111111111111111111111111",
            "executable": false,
            "data": ["eJw=", "base64+zstd"]
        });
        let err = serde_json::from_value::<AccountInfo>(value).unwrap_err();
        assert!(err.to_string().contains("unsupported account data encoding"));
    }

    #[test]
    fn blockhash_parses() {
        let value = json!({
            "blockhash": "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N",
            "lastValidBlockHeight": 3090
        });
        let bh: Blockhash = serde_json::from_value(value).unwrap();
        assert_eq!(bh.last_valid_block_height, Some(3090));
        assert_eq!(
            bh.hash().unwrap().to_string(),
            "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N"
        );
    }

    #[test]
    fn blockhash_rejects_garbage() {
        let bh = Blockhash {
            blockhash: "xyz".into(),
            last_valid_block_height: None,
        };
        assert!(bh.hash().is_err());
    }
}
