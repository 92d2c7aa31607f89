//! RDF vocabulary constants for OWL ontologies in the OBO style.
//!
//! - `rdf:`, `rdfs:`, `owl:`, `xsd:` -- W3C namespaces
//! - `obo:` (http://purl.obolibrary.org/obo/) -- OBO Foundry terms (definitions, part_of)
//! - `oboInOwl:` -- OBO-in-OWL annotation properties (short identifiers)

/// Standard RDF/RDFS/OWL/XML namespace URIs
pub mod standard {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

    pub const RDF_RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#RDF";
    pub const RDF_DESCRIPTION: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Description";
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
    pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
    pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";
}

/// OBO Foundry vocabulary (`obo:` prefix)
pub mod obo {
    pub const PREFIX: &str = "obo";
    pub const NS: &str = "http://purl.obolibrary.org/obo/";

    /// IAO "definition" annotation property.
    pub const DEFINITION: &str = "http://purl.obolibrary.org/obo/IAO_0000115";
    /// BFO "part of" object property.
    pub const PART_OF: &str = "http://purl.obolibrary.org/obo/BFO_0000050";
}

/// OBO-in-OWL annotation properties (`oboInOwl:` prefix)
pub mod obo_in_owl {
    pub const PREFIX: &str = "oboInOwl";
    pub const NS: &str = "http://www.geneontology.org/formats/oboInOwl#";

    pub const ID: &str = "http://www.geneontology.org/formats/oboInOwl#id";
}
