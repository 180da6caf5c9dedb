//! The bundled fixed-template generator.

use crate::plan::PlanContent;
use crate::profile::StudentProfile;

use super::trait_def::PlanGenerator;

const ACADEMIC_GOALS: &str = "\
1. Desenvolver habilidades de leitura funcional, reconhecendo palavras comuns do cotidiano.
2. Melhorar a capacidade de contar e reconhecer números de 1 a 20.
3. Desenvolver habilidade de escrever o próprio nome completo sem assistência.
4. Melhorar a capacidade de seguir instruções escritas simples com apoio visual.
5. Desenvolver habilidades básicas de organização do material escolar.";

const SOCIAL_GOALS: &str = "\
1. Iniciar interações sociais com colegas pelo menos uma vez por dia.
2. Participar de atividades em grupo pequeno (2-3 crianças) por 10 minutos.
3. Aprender a esperar sua vez durante jogos e atividades.
4. Reconhecer e nomear pelo menos 3 emoções básicas.
5. Praticar cumprimentos sociais adequados na entrada e saída da escola.";

const COMMUNICATION_GOALS: &str = "\
1. Utilizar frases de 3-4 palavras para fazer pedidos.
2. Responder a perguntas simples relacionadas à rotina escolar.
3. Usar cartões de comunicação para expressar necessidades quando estressado.
4. Manter contato visual por 3-5 segundos durante interações.
5. Praticar o uso de \"por favor\" e \"obrigado\" nas interações diárias.";

const ADAPTATION_STRATEGIES: &str = "\
1. Utilizar apoios visuais para rotinas e transições.
2. Oferecer tempo extra para processamento e resposta.
3. Proporcionar local tranquilo para momentos de regulação sensorial.
4. Adaptar materiais com alto contraste visual e menos elementos distratores.
5. Utilizar abordagem multissensorial para novos conceitos.
6. Implementar sistema de recompensas visual para comportamentos positivos.
7. Preparar o aluno para mudanças na rotina com antecedência.";

const EVALUATION_METHODS: &str = "\
1. Observação direta com registro em checklist semanal.
2. Avaliações orais adaptadas em vez de escritas quando apropriado.
3. Portfólio de trabalhos para mostrar progresso ao longo do tempo.
4. Reuniões mensais com equipe multidisciplinar para avaliar progresso.
5. Feedback regular dos pais sobre generalização de habilidades em casa.";

/// Returns the same plan for every student.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl PlanGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        "template"
    }

    fn generate(&self, _profile: &StudentProfile) -> PlanContent {
        PlanContent {
            academic_goals: ACADEMIC_GOALS.to_string(),
            social_goals: SOCIAL_GOALS.to_string(),
            communication_goals: COMMUNICATION_GOALS.to_string(),
            adaptation_strategies: ADAPTATION_STRATEGIES.to_string(),
            evaluation_methods: EVALUATION_METHODS.to_string(),
        }
    }
}
