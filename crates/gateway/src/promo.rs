//! Promotional push for registered applicants.
//!
//! The back office posts `/enviar-mensaje` after a form registration;
//! this module sends the three-part pitch (greeting, pricing, closing)
//! and, when the matcher finds one, the brochure in between.

use tracing::warn;

use prospecto_catalog::ProgramKind;
use prospecto_core::error::DeliveryError;
use prospecto_matching::MatchTier;

use crate::GatewayState;

/// Which brochure went out with the promo, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrochureSent {
    Programa,
    Facultad,
    Ninguno,
}

impl BrochureSent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrochureSent::Programa => "programa",
            BrochureSent::Facultad => "facultad",
            BrochureSent::Ninguno => "ninguno",
        }
    }
}

struct Pricing {
    precio: &'static str,
    duracion: &'static str,
    cuenta: &'static str,
    cci: &'static str,
}

fn pricing_for(kind: Option<ProgramKind>) -> Pricing {
    match kind {
        Some(ProgramKind::Maestria) => Pricing {
            precio: "S/ 200.00",
            duracion: "3 semestres académicos",
            cuenta: "000-3747336",
            cci: "009-100-000003747336-90",
        },
        Some(ProgramKind::Doctorado) => Pricing {
            precio: "S/ 250.00",
            duracion: "6 semestres académicos",
            cuenta: "000-3747336",
            cci: "009-100-000003747336-90",
        },
        Some(ProgramKind::Especialidad) => Pricing {
            precio: "S/ 120.00",
            duracion: "2 semestres académicos",
            cuenta: "000-1797042",
            cci: "009-100-000001797042-97",
        },
        // Unrecognized kind: every field renders empty.
        None => Pricing {
            precio: "",
            duracion: "",
            cuenta: "",
            cci: "",
        },
    }
}

fn greeting(mensaje: &str) -> String {
    format!(
        "👋 Felicidades {mensaje}\n\
         *Somos de la Escuela de Posgrado de la UNAC*\n\
         🚀 Ya se encuentra registrado para nuestros programas de Posgrado!"
    )
}

fn pricing_message(kind: Option<ProgramKind>) -> String {
    let p = pricing_for(kind);
    format!(
        "💥 ¡Quiero contarte sobre nuestro programa de posgrado y los increíbles beneficios que puedes obtener! 🎓\n\
         \n\
         📌 Costo de Inscripción:\n\
         Por solo {precio} recibirás:\n\
         📂 Carpeta de Postulante\n\
         📝 Derecho de Inscripción\n\
         \n\
         🏦 Medios de Pago:\n\
         CCI: {cci}\n\
         N° Cta. Cte.: {cuenta} (Scotiabank)\n\
         \n\
         📅 Fechas importantes:\n\
         🖋 Inscripciones: Hasta el 18 de marzo del 2026\n\
         📹 Entrevista virtual: última semana de Marzo del 2026\n\
         📃 Resultados: 1-2 días después del examen\n\
         🎒 Inicio de clases: Primera semana de Abril\n\
         \n\
         ⏳ Duración del programa: {duracion}\n\
         💵 Costo por semestre: ~S/ 2500~ *S/ 2100*\n\
         \n\
         📲 Contáctanos ahora:\n\
         📩 posgrado.admision@unac.edu.pe\n\
         📞 900969591",
        precio = p.precio,
        cci = p.cci,
        cuenta = p.cuenta,
        duracion = p.duracion,
    )
}

const CLOSING: &str = "📌 Estoy disponible para resolver cualquier duda y acompañarte en tu proceso de inscripción.\n\
O puedes unirte al grupo de WhatsApp POSGRADO UNAC 2026-A:\n\
https://chat.whatsapp.com/IKNzlJiO6El6Ns8k4bixjF\n\
\n\
📩 Correo: posgrado.admision@unac.edu.pe\n\
📞 WhatsApp: 900969591\n\
\n\
🚀 ¡Escríbeme ahora y asegura tu cupo en la maestría!";

/// Send the full promo sequence to `numero`. Pricing follows the program
/// kind inferred from the request text; an unrecognized kind renders the
/// pricing fields blank.
pub async fn send_promo(
    state: &GatewayState,
    numero: &str,
    mensaje: &str,
    facultad: &str,
    programa: &str,
) -> Result<BrochureSent, DeliveryError> {
    state.courier.send_text(numero, &greeting(mensaje)).await?;

    let kind = ProgramKind::infer(programa);
    state.courier.send_text(numero, &pricing_message(kind)).await?;

    let sent = match state.matcher.resolve(programa, facultad) {
        Some(found) => {
            let (caption, sent) = match found.tier {
                MatchTier::Exact | MatchTier::TokenOverlap => (
                    format!("📄 Aquí está el brochure de *{programa}*:"),
                    BrochureSent::Programa,
                ),
                MatchTier::FacultyFallback => (
                    "📄 Aquí está el brochure de su facultad:".to_string(),
                    BrochureSent::Facultad,
                ),
            };
            state.courier.send_media(numero, &caption, &found.url).await?;
            sent
        }
        None => {
            warn!(
                programa,
                facultad, "No brochure matched; promo goes out without document"
            );
            BrochureSent::Ninguno
        }
    };

    state.courier.send_text(numero, CLOSING).await?;
    Ok(sent)
}
