use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMount {
	Path(String),
	Flag(bool),
}

pub(crate) fn deserialize<'de, D>(
	deserializer: D,
) -> Result<HashMap<String, Option<String>>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = HashMap::<String, RawMount>::deserialize(deserializer)?;
	raw.into_iter()
		.map(|(app, mount)| match mount {
			RawMount::Path(path) => Ok((app, Some(path))),
			RawMount::Flag(false) => Ok((app, None)),
			RawMount::Flag(true) => Err(de::Error::custom(format!(
				"mount point for `{}` must be a path or false",
				app
			))),
		})
		.collect()
}
