//! The admissions conversation.
//!
//! Node ids, prompts and routes for the whole assistant. The copy is
//! what prospective students actually read, so it stays in Spanish and
//! changes here must be coordinated with the admissions office.

use prospecto_catalog::ProgramKind;
use prospecto_core::error::FlowError;

use crate::copy::MessagePack;
use crate::graph::FlowGraph;
use crate::node::{FlowNode, NodeId, Reply, Segment, Transform};

pub const WELCOME: NodeId = "welcome";
pub const MENU: NodeId = "menu";
pub const PROGRAMAS: NodeId = "programas";
pub const MAESTRIAS_FACULTADES: NodeId = "maestrias_facultades";
pub const MAESTRIAS_SELECT: NodeId = "maestrias_select";
pub const MAESTRIAS_OTRA: NodeId = "maestrias_otra";
pub const DOCTORADOS_FACULTADES: NodeId = "doctorados_facultades";
pub const DOCTORADOS_SELECT: NodeId = "doctorados_select";
pub const DOCTORADOS_OTRO: NodeId = "doctorados_otro";
pub const ADMISION: NodeId = "admision";
pub const REQUISITOS: NodeId = "requisitos";
pub const FECHAS_ADMISION: NodeId = "fechas_admision";
pub const GUIA_POSTULANTE: NodeId = "guia_postulante";
pub const COSTOS: NodeId = "costos";
pub const ADMISION_MAS: NodeId = "admision_mas";
pub const TALLER_TESIS: NodeId = "taller_tesis";
pub const CALENDARIO: NodeId = "calendario";
pub const CONTACTO_TIPO: NodeId = "contacto_tipo";
pub const CONTACTO_CANAL: NodeId = "contacto_canal";
pub const CONTACTO_NOMBRE: NodeId = "contacto_nombre";
pub const CONTACTO_CORREO: NodeId = "contacto_correo";
pub const CONTACTO_TELEFONO: NodeId = "contacto_telefono";
pub const CONTACTO_MENSAJE: NodeId = "contacto_mensaje";
pub const DESPEDIDA: NodeId = "despedida";

pub const ESCUELA_IMG: &str = "https://posgrado.unac.edu.pe/img/escuela.jpg";
pub const ENTRADA_IMG: &str = "https://github.com/JeysonRG1804/brochure/raw/main/entrada.png";
pub const FECHAS_IMG: &str =
    "https://github.com/JeysonRG1804/brochure/raw/main/fechasadmision.png";
pub const TALLER_IMG: &str = "https://github.com/JeysonRG1804/brochure/raw/main/tallertesis.png";
pub const GUIA_PDF: &str = "https://posgrado.unac.edu.pe/CHATBOT/Guia_de_Postulante.pdf";

pub const FAREWELL: &str =
    "👋 ¡Gracias por comunicarte con nosotros! Que tengas un excelente día.";

/// Keywords that close the conversation when no session is active.
pub const FAREWELL_KEYWORDS: [&str; 3] = ["adios", "bye", "chau"];

const MAESTRIA_FACULTADES: &[(&str, &str)] = &[
    ("1", "1"),
    ("2", "2"),
    ("3", "3"),
    ("4", "4"),
    ("5", "5"),
    ("6", "6"),
    ("7", "7"),
    ("8", "8"),
    ("9", "9"),
    ("10", "10"),
    ("11", "11"),
    ("12", "12"),
];

// The doctoral menu is a curated subset; its option 6 is the education
// faculty, id 12 in the catalog.
const DOCTORADO_FACULTADES: &[(&str, &str)] = &[
    ("1", "1"),
    ("2", "2"),
    ("3", "3"),
    ("4", "4"),
    ("5", "5"),
    ("6", "12"),
];

/// Build the full conversation graph over the loaded copy.
pub fn build_graph(copy: &MessagePack) -> Result<FlowGraph, FlowError> {
    let nodes = vec![
        FlowNode::tell(
            WELCOME,
            vec![
                Segment::text(
                    "🌟 *BIENVENIDO A LA ESCUELA DE POSGRADO DE LA UNIVERSIDAD NACIONAL DEL CALLAO* 🌟\n\
                     Aquí, la excelencia académica se combina con el compromiso y la vocación de servicio, formando líderes que impactan en la sociedad.\n\
                     *Una universidad con un rostro humano*, donde cada estudiante es parte de una comunidad que inspira, acompaña y fortalece.\n\
                     ¡Es momento de crecer juntos!",
                ),
                Segment::with_media("BIENVENIDOS", ENTRADA_IMG),
            ],
            MENU,
        ),
        FlowNode::ask(
            MENU,
            vec![Segment::text(&copy.menu)],
            Reply::Menu {
                options: &[
                    ("1", PROGRAMAS),
                    ("2", ADMISION),
                    ("3", CALENDARIO),
                    ("4", TALLER_TESIS),
                    ("5", CONTACTO_TIPO),
                ],
            },
        ),
        FlowNode::ask(
            PROGRAMAS,
            vec![Segment::text(&copy.programas)],
            Reply::Menu {
                options: &[
                    ("1", MAESTRIAS_FACULTADES),
                    ("2", DOCTORADOS_FACULTADES),
                    ("0", MENU),
                ],
            },
        ),
        FlowNode::ask(
            MAESTRIAS_FACULTADES,
            vec![
                Segment::text("*MAESTRÍAS DE LA UNIVERSIDAD NACIONAL DEL CALLAO*"),
                Segment::with_media("Estas son nuestras facultades:", ESCUELA_IMG),
                Segment::text(
                    "1️⃣ Facultad de Ciencias de la Salud\n\
                     2️⃣ Facultad de Ciencias Administrativas\n\
                     3️⃣ Facultad de Ingeniería Industrial y de Sistemas\n\
                     4️⃣ Facultad de Ciencias Contables\n\
                     5️⃣ Facultad de Ingeniería Eléctrica y Electrónica\n\
                     6️⃣ Facultad de Ingeniería Pesquera y de Alimentos\n\
                     7️⃣ Facultad de Ingeniería Mecánica y Energía\n\
                     8️⃣ Facultad de Ciencias Naturales y Matemática\n\
                     9️⃣ Facultad de Ingeniería Ambiental y Recursos Naturales\n\
                     🔟 Facultad de Ciencias Económicas\n\
                     1️⃣1️⃣ Facultad de Ingeniería Química\n\
                     1️2️⃣ Facultad de Ciencias de la Educación\n\
                     0️⃣ Volver al menú principal",
                ),
            ],
            Reply::FacultyPick {
                kind: ProgramKind::Maestria,
                choices: MAESTRIA_FACULTADES,
                back: PROGRAMAS,
                next: MAESTRIAS_SELECT,
            },
        ),
        FlowNode::ask(
            MAESTRIAS_SELECT,
            vec![Segment::text("📩 Seleccione una maestría:")],
            Reply::ProgramPick {
                kind: ProgramKind::Maestria,
                back: MAESTRIAS_FACULTADES,
                next: MAESTRIAS_OTRA,
            },
        ),
        FlowNode::ask(
            MAESTRIAS_OTRA,
            vec![Segment::text(
                "¿Necesita consultar otra maestría?, digite el número la acción a realizar\n\
                 1️⃣ *SI* 📜\n\
                 2️⃣ *NO*",
            )],
            Reply::Confirm {
                yes: MAESTRIAS_FACULTADES,
                no: DESPEDIDA,
            },
        ),
        FlowNode::ask(
            DOCTORADOS_FACULTADES,
            vec![
                Segment::text("*DOCTORADOS DE LA UNIVERSIDAD NACIONAL DEL CALLAO*"),
                Segment::with_media("Estas son nuestras facultades:", ESCUELA_IMG),
                Segment::text(
                    "1️⃣ Facultad de Ciencias de la Salud\n\
                     2️⃣ Facultad de Ciencias Administrativas\n\
                     3️⃣ Facultad de Ingeniería Industrial y de Sistemas\n\
                     4️⃣ Facultad de Ciencias Contables\n\
                     5️⃣ Facultad de Ingeniería Eléctrica y Electrónica\n\
                     6️⃣ Facultad de Ciencias de la Educación\n\
                     0️⃣ Volver al menú principal",
                ),
            ],
            Reply::FacultyPick {
                kind: ProgramKind::Doctorado,
                choices: DOCTORADO_FACULTADES,
                back: PROGRAMAS,
                next: DOCTORADOS_SELECT,
            },
        ),
        FlowNode::ask(
            DOCTORADOS_SELECT,
            vec![Segment::text("📩 Seleccione un Doctorado:")],
            Reply::ProgramPick {
                kind: ProgramKind::Doctorado,
                back: DOCTORADOS_FACULTADES,
                next: DOCTORADOS_OTRO,
            },
        ),
        FlowNode::ask(
            DOCTORADOS_OTRO,
            vec![Segment::text(
                "¿Necesita consultar otro doctorado?, digite el número de la acción a realizar\n\
                 1️⃣ *SI* 📜\n\
                 2️⃣ *NO*",
            )],
            Reply::Confirm {
                yes: DOCTORADOS_FACULTADES,
                no: DESPEDIDA,
            },
        ),
        FlowNode::ask(
            ADMISION,
            vec![Segment::text(&copy.admision)],
            Reply::Menu {
                options: &[
                    ("1", REQUISITOS),
                    ("2", FECHAS_ADMISION),
                    ("3", GUIA_POSTULANTE),
                    ("4", COSTOS),
                    ("0", MENU),
                ],
            },
        ),
        FlowNode::tell(REQUISITOS, vec![Segment::text(&copy.requisitos)], ADMISION_MAS),
        FlowNode::tell(
            FECHAS_ADMISION,
            vec![Segment::with_media("Estas son nuestras fechas", FECHAS_IMG)],
            ADMISION_MAS,
        ),
        FlowNode::tell(
            GUIA_POSTULANTE,
            vec![
                Segment::text(
                    "Encuentra toda la información necesaria para postular con éxito:\n \
                     ✔️ Requisitos generales y específicos\n \
                     ✔️ Cronograma del proceso de admisión\n \
                     ✔️ Procedimiento de inscripción paso a paso\n\
                     ✔️ Contactos y enlaces útiles",
                ),
                Segment::with_media("Este es nuestra guía de admisión:", GUIA_PDF),
            ],
            ADMISION_MAS,
        ),
        FlowNode::tell(COSTOS, vec![Segment::text(&copy.costos)], ADMISION_MAS),
        FlowNode::ask(
            ADMISION_MAS,
            vec![Segment::text(
                "¿Necesitas mayor información sobre admisión?, digite el número la acción a realizar\n\
                 1️⃣ *SI* 📜\n\
                 2️⃣ *NO*",
            )],
            Reply::Confirm {
                yes: ADMISION,
                no: DESPEDIDA,
            },
        ),
        FlowNode::tell(
            TALLER_TESIS,
            vec![
                Segment::text("*¡Bienvenido al Taller de Tesis!*"),
                Segment::text(
                    "Aquí encontrarás recursos y apoyo para tu proyecto de tesis, desde la formulación de la propuesta hasta la defensa final.",
                ),
                Segment::with_media(
                    "Si tienes de 5 a más años de egresado, puedes participar en nuestro Taller de Tesis para mejorar tu proyecto y recibir orientación personalizada.",
                    TALLER_IMG,
                ),
            ],
            ADMISION_MAS,
        ),
        FlowNode::end(
            CALENDARIO,
            vec![Segment::text(
                "Este es nuestro nuevo calendario académico para el 2025-II, puede visitar nuestra página web:\n\
                 https://posgrado.unac.edu.pe/admision/cronograma-academico-2025-i.html",
            )],
        ),
        FlowNode::ask(
            CONTACTO_TIPO,
            vec![Segment::text(
                "📋 *Formulario de contacto personalizado*\n\
                 ¿Cuál es el tipo de consulta?\n\
                 1. Información académica\n\
                 2. Admisiones y becas\n\
                 3. Proceso de inscripción\n\
                 4. Documentación\n\
                 5. Otro",
            )],
            Reply::Field {
                name: "tipoConsulta",
                transform: Transform::Keep,
                allowed: Some(&["1", "2", "3", "4", "5"]),
                next: CONTACTO_CANAL,
            },
        ),
        FlowNode::ask(
            CONTACTO_CANAL,
            vec![Segment::text(
                "¿Cuál es tu canal preferido para que te contactemos?\n\
                 1. WhatsApp\n\
                 2. Correo\n\
                 3. Teléfono\n\
                 4. Videollamada",
            )],
            Reply::Field {
                name: "canal",
                transform: Transform::Keep,
                allowed: Some(&["1", "2", "3", "4"]),
                next: CONTACTO_NOMBRE,
            },
        ),
        FlowNode::ask(
            CONTACTO_NOMBRE,
            vec![Segment::text("👤 Por favor, escribe tu *nombre completo*:")],
            Reply::Field {
                name: "nombre",
                transform: Transform::Keep,
                allowed: None,
                next: CONTACTO_CORREO,
            },
        ),
        FlowNode::ask(
            CONTACTO_CORREO,
            vec![Segment::text("📧 Ahora escribe tu *correo electrónico*:")],
            Reply::Field {
                name: "correo",
                transform: Transform::TrimLower,
                allowed: None,
                next: CONTACTO_TELEFONO,
            },
        ),
        FlowNode::ask(
            CONTACTO_TELEFONO,
            vec![Segment::text("📱 Tu *número de teléfono*:")],
            Reply::Field {
                name: "telefono",
                transform: Transform::Keep,
                allowed: None,
                next: CONTACTO_MENSAJE,
            },
        ),
        FlowNode::ask(
            CONTACTO_MENSAJE,
            vec![Segment::text(
                "✍️ Por último, escribe un *mensaje o detalle de tu consulta*:",
            )],
            Reply::Submit,
        ),
        FlowNode::end(DESPEDIDA, vec![Segment::text(FAREWELL)]),
    ];

    FlowGraph::new(nodes, WELCOME)
}
