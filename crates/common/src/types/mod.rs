mod brand;

pub use brand::{
    AboutBrand, AppBrand, BrandDocument, BrandEnvelope, HtmlToggles, MetaBrand, OgBrand,
    SiteBrand,
};
