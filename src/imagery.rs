//! Typed imagery provider dispatch for resolved assets.

// self
use crate::{_prelude::*, resource::AssetResource};

/// Closed set of imagery provider kinds the factory understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageryKind {
	/// ArcGIS MapServer imagery.
	ArcGisMapServer,
	/// Bing Maps imagery.
	Bing,
	/// Google Earth Enterprise imagery.
	GoogleEarth,
	/// Mapbox-hosted imagery.
	Mapbox,
	/// A single, untiled image.
	SingleTile,
	/// Tile-map-service imagery.
	TileMapService,
	/// URL-template tiled imagery.
	UrlTemplate,
	/// OGC Web Map Service imagery.
	WebMapService,
	/// OGC Web Map Tile Service imagery.
	WebMapTileService,
}
impl ImageryKind {
	/// Maps a wire type tag onto a provider kind.
	///
	/// `IMAGERY` and `TMS` are aliases by design; both produce
	/// [`ImageryKind::TileMapService`]. Tags outside the closed set yield `None`.
	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag {
			"ARCGIS_MAPSERVER" => Some(Self::ArcGisMapServer),
			"BING" => Some(Self::Bing),
			"GOOGLE_EARTH" => Some(Self::GoogleEarth),
			"IMAGERY" | "TMS" => Some(Self::TileMapService),
			"MAPBOX" => Some(Self::Mapbox),
			"SINGLE_TILE" => Some(Self::SingleTile),
			"URL_TEMPLATE" => Some(Self::UrlTemplate),
			"WMS" => Some(Self::WebMapService),
			"WMTS" => Some(Self::WebMapTileService),
			_ => None,
		}
	}

	/// Returns a stable label suitable for spans and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ArcGisMapServer => "arcgis_mapserver",
			Self::Bing => "bing",
			Self::GoogleEarth => "google_earth",
			Self::Mapbox => "mapbox",
			Self::SingleTile => "single_tile",
			Self::TileMapService => "tile_map_service",
			Self::UrlTemplate => "url_template",
			Self::WebMapService => "web_map_service",
			Self::WebMapTileService => "web_map_tile_service",
		}
	}
}
impl Display for ImageryKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Imagery provider handle produced by factory dispatch.
///
/// Every variant keeps the resolved [`AssetResource`] as its source rather than a
/// frozen URL string, so requests issued through the provider keep routing through
/// the same credential-renewal machinery.
#[derive(Clone, Debug)]
pub enum ImageryProvider {
	/// ArcGIS MapServer-backed imagery.
	ArcGisMapServer(AssetResource),
	/// Bing Maps-backed imagery.
	Bing(AssetResource),
	/// Google Earth Enterprise-backed imagery.
	GoogleEarth(AssetResource),
	/// Mapbox-backed imagery.
	Mapbox(AssetResource),
	/// Single-image imagery.
	SingleTile(AssetResource),
	/// Tile-map-service imagery; also constructed for the legacy `IMAGERY` tag.
	TileMapService(AssetResource),
	/// URL-template imagery.
	UrlTemplate(AssetResource),
	/// Web Map Service imagery.
	WebMapService(AssetResource),
	/// Web Map Tile Service imagery.
	WebMapTileService(AssetResource),
}
impl ImageryProvider {
	/// Dispatches on the resolved descriptor's type tag.
	///
	/// Unknown tags fail fast with an error naming the tag; no fallback provider is
	/// attempted.
	pub fn from_resource(resource: AssetResource) -> Result<Self> {
		let type_tag = resource.endpoint().asset_type;
		let kind = ImageryKind::from_tag(&type_tag)
			.ok_or(Error::UnrecognizedAssetType { type_tag })?;

		Ok(kind.construct(resource))
	}

	/// Kind of this provider.
	pub fn kind(&self) -> ImageryKind {
		match self {
			Self::ArcGisMapServer(_) => ImageryKind::ArcGisMapServer,
			Self::Bing(_) => ImageryKind::Bing,
			Self::GoogleEarth(_) => ImageryKind::GoogleEarth,
			Self::Mapbox(_) => ImageryKind::Mapbox,
			Self::SingleTile(_) => ImageryKind::SingleTile,
			Self::TileMapService(_) => ImageryKind::TileMapService,
			Self::UrlTemplate(_) => ImageryKind::UrlTemplate,
			Self::WebMapService(_) => ImageryKind::WebMapService,
			Self::WebMapTileService(_) => ImageryKind::WebMapTileService,
		}
	}

	/// Resolved asset resource the provider fetches through.
	pub fn source(&self) -> &AssetResource {
		match self {
			Self::ArcGisMapServer(source)
			| Self::Bing(source)
			| Self::GoogleEarth(source)
			| Self::Mapbox(source)
			| Self::SingleTile(source)
			| Self::TileMapService(source)
			| Self::UrlTemplate(source)
			| Self::WebMapService(source)
			| Self::WebMapTileService(source) => source,
		}
	}
}
impl ImageryKind {
	fn construct(self, source: AssetResource) -> ImageryProvider {
		match self {
			Self::ArcGisMapServer => ImageryProvider::ArcGisMapServer(source),
			Self::Bing => ImageryProvider::Bing(source),
			Self::GoogleEarth => ImageryProvider::GoogleEarth(source),
			Self::Mapbox => ImageryProvider::Mapbox(source),
			Self::SingleTile => ImageryProvider::SingleTile(source),
			Self::TileMapService => ImageryProvider::TileMapService(source),
			Self::UrlTemplate => ImageryProvider::UrlTemplate(source),
			Self::WebMapService => ImageryProvider::WebMapService(source),
			Self::WebMapTileService => ImageryProvider::WebMapTileService(source),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		endpoint::{AssetEndpoint, EndpointResource},
		http::{FetchFuture, FetchResponse, JsonFetch},
	};

	struct NoopTransport;
	impl JsonFetch for NoopTransport {
		fn fetch(&self, _: Url) -> FetchFuture<'_> {
			Box::pin(async { Ok(FetchResponse { status: 200, body: Vec::new() }) })
		}
	}

	fn resource_of_type(asset_type: &str) -> AssetResource {
		let endpoint = AssetEndpoint {
			url: "https://assets.test.invalid/1".into(),
			asset_type: asset_type.into(),
			access_token: None,
		};
		let server = Url::parse("https://api.test.invalid").expect("Fixture URL should parse.");
		let endpoint_resource = EndpointResource::new(1, &server, None, Arc::new(NoopTransport))
			.expect("Endpoint resource fixture should build.");

		AssetResource::create(endpoint, endpoint_resource)
			.expect("Resource fixture should build from a valid descriptor.")
	}

	#[test]
	fn every_wire_tag_maps_onto_its_kind() {
		let table = [
			("ARCGIS_MAPSERVER", ImageryKind::ArcGisMapServer),
			("BING", ImageryKind::Bing),
			("GOOGLE_EARTH", ImageryKind::GoogleEarth),
			("IMAGERY", ImageryKind::TileMapService),
			("MAPBOX", ImageryKind::Mapbox),
			("SINGLE_TILE", ImageryKind::SingleTile),
			("TMS", ImageryKind::TileMapService),
			("URL_TEMPLATE", ImageryKind::UrlTemplate),
			("WMS", ImageryKind::WebMapService),
			("WMTS", ImageryKind::WebMapTileService),
		];

		for (tag, kind) in table {
			assert_eq!(ImageryKind::from_tag(tag), Some(kind), "tag {tag} should map");
		}
		assert_eq!(ImageryKind::from_tag("3DTILES"), None);
	}

	#[test]
	fn dispatch_keeps_the_resource_as_provider_source() {
		let resource = resource_of_type("WMS");
		let provider = ImageryProvider::from_resource(resource.clone())
			.expect("WMS dispatch should succeed.");

		assert_eq!(provider.kind(), ImageryKind::WebMapService);
		assert!(provider.source().shares_ancestry_with(&resource));
	}

	#[test]
	fn legacy_imagery_tag_aliases_tile_map_service() {
		let provider = ImageryProvider::from_resource(resource_of_type("IMAGERY"))
			.expect("IMAGERY dispatch should succeed.");

		assert!(matches!(provider, ImageryProvider::TileMapService(_)));
	}

	#[test]
	fn unknown_tags_fail_fast_and_name_the_tag() {
		let err = ImageryProvider::from_resource(resource_of_type("NOT_A_TYPE"))
			.expect_err("Unknown tags must not construct a provider.");

		assert!(matches!(
			&err,
			Error::UnrecognizedAssetType { type_tag } if type_tag == "NOT_A_TYPE"
		));
		assert!(err.to_string().contains("NOT_A_TYPE"));
	}
}
